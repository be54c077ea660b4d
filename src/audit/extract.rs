use anyhow::{Context, Result};
use regex::{Captures, Regex};
use serde_json::Value;

use crate::util::head_chars;

const JSON_LD_RAW_PREVIEW_CHARS: usize = 200;

/// An attribute value in double or single quotes. Each style is its own
/// group, so the other quote character may appear inside the value.
const QUOTED: &str = r#"(?:"([^"]*)"|'([^']*)')"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaTag {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Anchor {
    pub href: String,
    pub rel: String,
    pub target: String,
}

impl Anchor {
    pub fn has_rel(&self, token: &str) -> bool {
        self.rel
            .split_whitespace()
            .any(|value| value.eq_ignore_ascii_case(token))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsonLdBlock {
    Parsed(Value),
    ParseError { raw: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactBundle {
    pub title: Option<String>,
    pub meta: Vec<MetaTag>,
    pub canonical: Option<String>,
    pub html_lang: Option<String>,
    pub headings: Vec<Heading>,
    pub json_ld: Vec<JsonLdBlock>,
    pub anchors: Vec<Anchor>,
    pub word_count: usize,
}

impl FactBundle {
    /// First meta tag named `name` (`name=` or `property=`), non-empty only.
    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta
            .iter()
            .find(|tag| tag.name.eq_ignore_ascii_case(name))
            .map(|tag| tag.content.as_str())
            .filter(|content| !content.is_empty())
    }

    pub fn description(&self) -> Option<&str> {
        self.meta("description")
    }

    pub fn h1_count(&self) -> usize {
        self.headings
            .iter()
            .filter(|heading| heading.level == 1)
            .count()
    }

    pub fn has_skipped_heading_level(&self) -> bool {
        self.headings
            .windows(2)
            .any(|pair| pair[1].level > pair[0].level + 1)
    }

    pub fn has_noindex(&self) -> bool {
        self.meta
            .iter()
            .filter(|tag| {
                tag.name.eq_ignore_ascii_case("robots") || tag.name.eq_ignore_ascii_case("googlebot")
            })
            .any(|tag| tag.content.to_ascii_lowercase().contains("noindex"))
    }
}

/// Pattern-based fact extraction over generated HTML. Patterns are compiled
/// once and shared by every page of a run.
#[derive(Debug)]
pub struct HtmlExtractor {
    title: Regex,
    meta_name_first: Regex,
    meta_content_first: Regex,
    canonical_rel_first: Regex,
    canonical_href_first: Regex,
    html_lang: Regex,
    heading_open: Regex,
    json_ld: Regex,
    anchor: Regex,
    href_attr: Regex,
    rel_attr: Regex,
    target_attr: Regex,
    script_block: Regex,
    style_block: Regex,
    tag: Regex,
    entity: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("failed to compile html pattern: {pattern}"))
}

impl HtmlExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            title: compile(r"(?is)<title[^>]*>(.*?)</title>")?,
            meta_name_first: compile(&format!(
                r"(?i)<meta\s+(?:name|property)={QUOTED}\s+content={QUOTED}"
            ))?,
            meta_content_first: compile(&format!(
                r"(?i)<meta\s+content={QUOTED}\s+(?:name|property)={QUOTED}"
            ))?,
            canonical_rel_first: compile(&format!(
                r#"(?i)<link[^>]+rel=["']canonical["'][^>]+href={QUOTED}"#
            ))?,
            canonical_href_first: compile(&format!(
                r#"(?i)<link[^>]+href={QUOTED}[^>]+rel=["']canonical["']"#
            ))?,
            html_lang: compile(&format!(r"(?i)<html\b[^>]*?\slang={QUOTED}"))?,
            heading_open: compile(r"(?i)<h([1-6])\b[^>]*>")?,
            json_ld: compile(
                r#"(?is)<script\s+type=["']application/ld\+json["'][^>]*>(.*?)</script>"#,
            )?,
            anchor: compile(r"(?is)<a\s+([^>]*)>")?,
            href_attr: compile(&format!(r"(?i)(?:^|\s)href={QUOTED}"))?,
            rel_attr: compile(&format!(r"(?i)(?:^|\s)rel={QUOTED}"))?,
            target_attr: compile(&format!(r"(?i)(?:^|\s)target={QUOTED}"))?,
            script_block: compile(r"(?is)<script\b.*?</script>")?,
            style_block: compile(r"(?is)<style\b.*?</style>")?,
            tag: compile(r"(?s)<[^>]+>")?,
            entity: compile(r"(?i)&#?[a-z0-9]+;")?,
        })
    }

    pub fn extract(&self, html: &str) -> FactBundle {
        FactBundle {
            title: self.extract_title(html),
            meta: self.extract_meta(html),
            canonical: self.extract_canonical(html),
            html_lang: first_quoted(&self.html_lang, html),
            headings: self.extract_headings(html),
            json_ld: self.extract_json_ld(html),
            anchors: self.extract_anchors(html),
            word_count: self.count_words(html),
        }
    }

    pub fn extract_title(&self, html: &str) -> Option<String> {
        self.title
            .captures(html)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().trim().to_string())
            .filter(|title| !title.is_empty())
    }

    /// Name-first matches precede content-first matches, so a lookup prefers
    /// the conventional attribute order.
    pub fn extract_meta(&self, html: &str) -> Vec<MetaTag> {
        let name_first = self.meta_name_first.captures_iter(html).map(|captures| MetaTag {
            name: quoted_text(&captures, 1),
            content: quoted_text(&captures, 3),
        });
        let content_first = self
            .meta_content_first
            .captures_iter(html)
            .map(|captures| MetaTag {
                name: quoted_text(&captures, 3),
                content: quoted_text(&captures, 1),
            });
        name_first.chain(content_first).collect()
    }

    pub fn extract_canonical(&self, html: &str) -> Option<String> {
        first_quoted(&self.canonical_rel_first, html)
            .or_else(|| first_quoted(&self.canonical_href_first, html))
            .filter(|href| !href.is_empty())
    }

    pub fn extract_headings(&self, html: &str) -> Vec<Heading> {
        let lowered = html.to_ascii_lowercase();
        let mut headings = Vec::new();
        let mut cursor = 0;

        while let Some(captures) = self.heading_open.captures_at(html, cursor) {
            let (Some(open), Some(level)) = (captures.get(0), captures.get(1)) else {
                break;
            };
            let level_digit = level.as_str();
            let closing = format!("</h{level_digit}>");
            let Some(relative_end) = lowered[open.end()..].find(&closing) else {
                cursor = open.end();
                continue;
            };
            let inner = &html[open.end()..open.end() + relative_end];
            headings.push(Heading {
                level: level_digit.parse::<u8>().unwrap_or(1),
                text: self.tag.replace_all(inner, "").trim().to_string(),
            });
            cursor = open.end() + relative_end + closing.len();
        }

        headings
    }

    pub fn extract_json_ld(&self, html: &str) -> Vec<JsonLdBlock> {
        self.json_ld
            .captures_iter(html)
            .map(|captures| {
                let raw = captures.get(1).map(|value| value.as_str()).unwrap_or_default();
                match serde_json::from_str::<Value>(raw) {
                    Ok(value) => JsonLdBlock::Parsed(value),
                    Err(_) => JsonLdBlock::ParseError {
                        raw: head_chars(raw, JSON_LD_RAW_PREVIEW_CHARS).to_string(),
                    },
                }
            })
            .collect()
    }

    pub fn extract_anchors(&self, html: &str) -> Vec<Anchor> {
        self.anchor
            .captures_iter(html)
            .map(|captures| {
                let attrs = captures.get(1).map(|value| value.as_str()).unwrap_or_default();
                Anchor {
                    href: first_quoted(&self.href_attr, attrs).unwrap_or_default(),
                    rel: first_quoted(&self.rel_attr, attrs).unwrap_or_default(),
                    target: first_quoted(&self.target_attr, attrs).unwrap_or_default(),
                }
            })
            .collect()
    }

    pub fn count_words(&self, html: &str) -> usize {
        let without_scripts = self.script_block.replace_all(html, "");
        let without_styles = self.style_block.replace_all(&without_scripts, "");
        let without_tags = self.tag.replace_all(&without_styles, " ");
        let text = self.entity.replace_all(&without_tags, " ");
        text.split_whitespace().count()
    }
}

/// Value of a `QUOTED` pair whose double-quoted group is `group` and whose
/// single-quoted group follows it.
fn quoted_text(captures: &Captures<'_>, group: usize) -> String {
    captures
        .get(group)
        .or_else(|| captures.get(group + 1))
        .map(|value| value.as_str().to_string())
        .unwrap_or_default()
}

fn first_quoted(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .map(|captures| quoted_text(&captures, 1))
}
