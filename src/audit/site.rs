use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::extract::{FactBundle, HtmlExtractor};

#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub html: String,
    pub facts: FactBundle,
}

/// One run's view of the build output, ordered by URL. Pages are read and
/// extracted once per run and shared by every evaluator after the build
/// section.
#[derive(Debug, Clone, Default)]
pub struct Site {
    pub pages: Vec<Page>,
}

impl Site {
    pub fn load(dist: &Path, extractor: &HtmlExtractor) -> Self {
        let mut pages = discover_html_files(dist)
            .into_iter()
            .map(|path| {
                let html = read_html(&path);
                let url = url_from_file(dist, &path);
                let facts = extractor.extract(&html);
                Page { url, html, facts }
            })
            .collect::<Vec<Page>>();
        pages.sort_by(|left, right| left.url.cmp(&right.url));

        debug!(dist = %dist.display(), pages = pages.len(), "loaded build output");
        Self { pages }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.url.as_str())
    }
}

/// Recursively collects `*.html` files in a stable order. Unreadable
/// directories are skipped rather than failing the walk.
pub fn discover_html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    walk(dir, &mut files);
    files.sort();
    files
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            walk(&path, files);
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "html")
        {
            files.push(path);
        }
    }
}

fn read_html(path: &Path) -> String {
    match fs::read(path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to read html file");
            String::new()
        }
    }
}

pub fn url_from_file(dist: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dist).unwrap_or(path);
    normalize_page_url(&relative.to_string_lossy())
}

/// Maps a build-relative file path to its site URL: `index.html` becomes `/`,
/// `a/index.html` and `a.html` become `/a/`. Already-normalized URLs map to
/// themselves.
pub fn normalize_page_url(relative: &str) -> String {
    let unified = relative.replace('\\', "/");
    let trimmed = unified.trim_start_matches('/');
    if trimmed.is_empty() || trimmed == "index.html" {
        return "/".to_string();
    }

    let mut url = if let Some(stem) = trimmed.strip_suffix("/index.html") {
        format!("{stem}/")
    } else if let Some(stem) = trimmed.strip_suffix(".html") {
        format!("{stem}/")
    } else {
        trimmed.to_string()
    };

    if !url.ends_with('/') {
        url.push('/');
    }
    format!("/{url}")
}
