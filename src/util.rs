use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

pub fn now_utc_string() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn ensure_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("failed to create directory: {}", path.display()))
}

/// Writes `value` next to `path` first and renames it into place, so readers
/// never observe a half-written document.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    let data = serde_json::to_vec_pretty(value)
        .with_context(|| format!("failed to serialize json: {}", path.display()))?;

    let tmp_path = path.with_extension("json.tmp");
    let mut file = File::create(&tmp_path)
        .with_context(|| format!("failed to create json file: {}", tmp_path.display()))?;
    file.write_all(&data)
        .with_context(|| format!("failed to write json file: {}", tmp_path.display()))?;
    file.write_all(b"\n")
        .with_context(|| format!("failed to finalize json file: {}", tmp_path.display()))?;
    drop(file);

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "failed to move {} into place at {}",
            tmp_path.display(),
            path.display()
        )
    })?;

    Ok(())
}

/// Last `max_chars` characters of `text`, respecting char boundaries.
pub fn tail_chars(text: &str, max_chars: usize) -> &str {
    let count = text.chars().count();
    if count <= max_chars {
        return text;
    }
    let skip = count - max_chars;
    match text.char_indices().nth(skip) {
        Some((offset, _)) => &text[offset..],
        None => text,
    }
}

/// First `max_chars` characters of `text`, respecting char boundaries.
pub fn head_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

/// Joins at most `limit` examples with `separator`, appending `+N more` when
/// the list was truncated.
pub fn join_examples(items: &[String], limit: usize, separator: &str) -> String {
    let mut joined = items
        .iter()
        .take(limit)
        .map(String::as_str)
        .collect::<Vec<&str>>()
        .join(separator);
    if items.len() > limit {
        joined.push_str(&format!(" +{} more", items.len() - limit));
    }
    joined
}
