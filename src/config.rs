use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::model::CheckStatus;

pub const DEFAULT_CONFIG_FILE: &str = "launch-audit.json";

/// Site policy for the automated sections. Every field has a default, so a
/// config file only needs to name what differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub site_domain: String,
    pub expected_lang: String,
    pub affiliate_domains: Vec<String>,
    pub title_max_chars: usize,
    pub meta_description_max_chars: usize,
    pub page_count: PageCountPolicy,
    pub command_timeout_secs: u64,
    pub commands: Vec<CommandCheck>,
    pub build_outputs: Vec<String>,
    pub source_inventory: Vec<String>,
    pub config_probes: Vec<ConfigProbe>,
    pub pages: PageClassPolicy,
    pub orphan_exempt_urls: Vec<String>,
    pub asset_extensions: Vec<String>,
    pub related_markers: Vec<String>,
    pub related_min_links: usize,
    pub placeholder_patterns: Vec<String>,
    pub word_floors: BTreeMap<String, usize>,
    pub product_image_markers: Vec<String>,
    pub cons_markers: Vec<String>,
    pub disclosure_markers: Vec<String>,
    pub disclosure_min_ratio: f64,
    pub schema_min_ratio: f64,
    pub article_about_min_ratio: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageCountPolicy {
    pub pass_min: usize,
    pub warn_min: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandCheck {
    pub id: String,
    pub label: String,
    pub command: String,
    pub pass_detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigProbe {
    pub id: String,
    pub label: String,
    pub path: String,
    pub any_of: Vec<String>,
    pub missing_status: CheckStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageClassPolicy {
    pub home_url: String,
    pub not_found_url: String,
    pub hub_urls: Vec<String>,
    pub review_marker: String,
    pub comparison_marker: String,
    pub guide_marker: String,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PageClass {
    Home,
    NotFound,
    Hub,
    Review,
    Comparison,
    Guide,
    Other,
}

impl PageClass {
    pub fn word_floor_key(self) -> Option<&'static str> {
        match self {
            Self::Review => Some("review"),
            Self::Comparison => Some("comparison"),
            Self::Guide => Some("guide"),
            _ => None,
        }
    }

    /// Home, 404 and hub pages carry no article body.
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Home | Self::NotFound | Self::Hub)
    }
}

impl Default for PageClassPolicy {
    fn default() -> Self {
        Self {
            home_url: "/".to_string(),
            not_found_url: "/404/".to_string(),
            hub_urls: vec!["/guides/".to_string()],
            review_marker: "/reviews/".to_string(),
            comparison_marker: "-vs-".to_string(),
            guide_marker: "/guides/".to_string(),
        }
    }
}

impl PageClassPolicy {
    pub fn classify(&self, url: &str) -> PageClass {
        if url == self.home_url {
            PageClass::Home
        } else if url == self.not_found_url {
            PageClass::NotFound
        } else if self.hub_urls.iter().any(|hub| hub == url) {
            PageClass::Hub
        } else if url.contains(&self.review_marker) {
            PageClass::Review
        } else if url.contains(&self.comparison_marker) {
            PageClass::Comparison
        } else if url.contains(&self.guide_marker) {
            PageClass::Guide
        } else {
            PageClass::Other
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn command(id: &str, label: &str, command: &str, pass_detail: &str) -> CommandCheck {
    CommandCheck {
        id: id.to_string(),
        label: label.to_string(),
        command: command.to_string(),
        pass_detail: pass_detail.to_string(),
    }
}

fn probe(id: &str, label: &str, path: &str, any_of: &[&str], missing: CheckStatus) -> ConfigProbe {
    ConfigProbe {
        id: id.to_string(),
        label: label.to_string(),
        path: path.to_string(),
        any_of: strings(any_of),
        missing_status: missing,
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            site_domain: "offgridfilters.com".to_string(),
            expected_lang: "en".to_string(),
            affiliate_domains: strings(&["amazon.com", "amzn.to"]),
            title_max_chars: 60,
            meta_description_max_chars: 160,
            page_count: PageCountPolicy {
                pass_min: 70,
                warn_min: 50,
            },
            command_timeout_secs: 300,
            commands: vec![
                command(
                    "1.1.npm-install",
                    "npm install completes without errors",
                    "npm install --prefer-offline",
                    "Exit code 0",
                ),
                command(
                    "1.1.npm-lint",
                    "npm run lint passes",
                    "npm run lint",
                    "Zero warnings, zero errors",
                ),
                command(
                    "1.1.npm-test",
                    "npm run test passes all tests",
                    "npm run test",
                    "All tests passed",
                ),
                command(
                    "1.1.npm-build",
                    "npm run build completes with exit code 0",
                    "npm run build",
                    "Build succeeded",
                ),
            ],
            build_outputs: strings(&[
                "index.html",
                "sitemap-index.xml",
                "robots.txt",
                "404.html",
                "llms.txt",
                "favicon.ico",
                "favicon.png",
            ]),
            source_inventory: strings(&[
                "package.json",
                "astro.config.mjs",
                "tailwind.config.ts",
                "tsconfig.json",
                "postcss.config.js",
                "eslint.config.js",
                "vercel.json",
                ".gitignore",
                ".env.example",
                "product-brief.yaml",
                "CLAUDE.md",
                "IMAGE-GUIDE.md",
                ".github/workflows/ci.yml",
                "public/robots.txt",
                "public/favicon.ico",
                "public/favicon.png",
                "src/lib/config.ts",
                "src/lib/image-map.ts",
                "src/lib/schema.ts",
                "src/lib/schema.test.ts",
                "src/layouts/BaseLayout.astro",
                "src/layouts/ContentLayout.astro",
                "src/components/HeaderAstro.astro",
                "src/components/FooterAstro.astro",
                "src/components/BreadcrumbsAstro.astro",
                "src/components/RelatedArticlesAstro.astro",
                "src/components/StatCard.astro",
                "src/components/ProTip.astro",
                "src/components/Callout.astro",
                "src/components/ProductImage.astro",
                "src/components/ComparisonTable.astro",
                "src/components/EmailCapture.astro",
                "src/components/AffiliateDisclosure.astro",
                "src/components/ProductHero.astro",
                "src/pages/index.astro",
                "src/pages/404.astro",
                "src/pages/guides/index.astro",
                "src/pages/llms.txt.ts",
                "scripts/convert-to-webp.mjs",
                "scripts/generate-local-images.mjs",
                "scripts/image-gen-server.mjs",
                "research/product-catalog-research.md",
                "research/category-research.md",
                "research/market-research.md",
                "research/design-decisions.md",
                "research/site-plan.md",
            ]),
            config_probes: vec![
                probe(
                    "1.3.astro-site",
                    "astro.config.mjs has site URL",
                    "astro.config.mjs",
                    &["site:"],
                    CheckStatus::Fail,
                ),
                probe(
                    "1.3.astro-static",
                    "astro.config.mjs uses static output",
                    "astro.config.mjs",
                    &["'static'", "\"static\""],
                    CheckStatus::Warn,
                ),
                probe(
                    "1.3.astro-trailing",
                    "astro.config.mjs has trailingSlash",
                    "astro.config.mjs",
                    &["trailingSlash"],
                    CheckStatus::Fail,
                ),
                probe(
                    "1.3.vercel-csp",
                    "vercel.json has CSP header",
                    "vercel.json",
                    &["Content-Security-Policy", "content-security-policy"],
                    CheckStatus::Fail,
                ),
                probe(
                    "1.3.vercel-xframe",
                    "vercel.json has X-Frame-Options",
                    "vercel.json",
                    &["X-Frame-Options", "x-frame-options"],
                    CheckStatus::Fail,
                ),
                probe(
                    "1.3.vercel-buttondown",
                    "CSP form-action includes buttondown.com",
                    "vercel.json",
                    &["buttondown.com"],
                    CheckStatus::Fail,
                ),
            ],
            pages: PageClassPolicy::default(),
            orphan_exempt_urls: strings(&["/", "/404/"]),
            asset_extensions: strings(&[
                ".xml", ".txt", ".ico", ".png", ".jpg", ".jpeg", ".webp", ".svg", ".pdf", ".css",
                ".js",
            ]),
            related_markers: strings(&[
                "data-related-articles",
                "related-articles",
                "RelatedArticles",
                "related-reads",
            ]),
            related_min_links: 4,
            placeholder_patterns: strings(&[
                r"(?i)lorem ipsum",
                r"\bTODO\b",
                r"\bTBD\b",
                r"(?i)\[placeholder\]",
                r"(?i)coming soon",
            ]),
            word_floors: BTreeMap::from([
                ("comparison".to_string(), 1500),
                ("guide".to_string(), 2000),
                ("review".to_string(), 1500),
            ]),
            product_image_markers: strings(&["product-image", "productimage", "ProductImage"]),
            cons_markers: strings(&["Cons", "cons", "Weaknesses", "\u{274C}", "\u{2717}"]),
            disclosure_markers: strings(&["Amazon Associate", "amazon associate"]),
            disclosure_min_ratio: 0.95,
            schema_min_ratio: 0.80,
            article_about_min_ratio: 0.80,
        }
    }
}

impl AuditConfig {
    /// Loads `explicit` when given, otherwise `<root>/launch-audit.json` when it
    /// exists, otherwise the built-in defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let candidate = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Some(root.join(DEFAULT_CONFIG_FILE)).filter(|path| path.exists()),
        };

        let Some(path) = candidate else {
            return Ok(Self::default());
        };

        let raw = fs::read(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.compile_placeholder_patterns()?;

        info!(path = %path.display(), "loaded audit config");
        Ok(config)
    }

    pub fn compile_placeholder_patterns(&self) -> Result<Vec<Regex>> {
        self.placeholder_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("invalid placeholder pattern: {pattern}"))
            })
            .collect()
    }

    pub fn word_floor(&self, class: PageClass) -> Option<usize> {
        class
            .word_floor_key()
            .and_then(|key| self.word_floors.get(key).copied())
    }

    pub fn is_affiliate_href(&self, href: &str) -> bool {
        self.affiliate_domains
            .iter()
            .any(|domain| href.contains(domain.as_str()))
    }

    pub fn is_asset_path(&self, path: &str) -> bool {
        let lowered = path.to_ascii_lowercase();
        self.asset_extensions
            .iter()
            .any(|extension| lowered.ends_with(&extension.to_ascii_lowercase()))
    }
}
