use crate::config::AuditConfig;
use crate::model::{CheckResult, CheckStatus};
use crate::util::{head_chars, join_examples};

use super::link_graph::{LinkGraph, normalize_internal_href};
use super::site::Site;
use super::{AuditContext, EXAMPLE_LIMIT, missing_build_output};

const BROKEN_LINK_EXAMPLES: usize = 10;
const ORPHAN_EXAMPLES: usize = 10;
const RELATED_MISSING_EXAMPLES: usize = 8;
const RELATED_FALLBACK_CHARS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Ignored,
    Affiliate,
    External,
    Relative,
    Internal(String),
}

/// Sorts an `href` into the buckets the linking checks care about. Internal
/// targets come back as a root-relative path with query and fragment removed.
pub fn classify_href(href: &str, config: &AuditConfig) -> LinkTarget {
    let href = href.trim();
    let lowered = href.to_ascii_lowercase();
    if href.is_empty()
        || href.starts_with('#')
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("javascript:")
    {
        return LinkTarget::Ignored;
    }
    if config.is_affiliate_href(href) {
        return LinkTarget::Affiliate;
    }

    let is_remote = ["https://", "http://", "//"]
        .iter()
        .any(|prefix| lowered.starts_with(prefix));

    if is_remote {
        let rest = href
            .find("//")
            .map(|index| &href[index + 2..])
            .unwrap_or(href);
        let (host, path) = match rest.find('/') {
            Some(index) => (&rest[..index], &rest[index..]),
            None => (rest, "/"),
        };
        let host = host.to_ascii_lowercase();
        let domain = config.site_domain.to_ascii_lowercase();
        if host == domain || host.ends_with(&format!(".{domain}")) {
            return LinkTarget::Internal(strip_query_and_fragment(path));
        }
        return LinkTarget::External;
    }

    if href.starts_with('/') {
        return LinkTarget::Internal(strip_query_and_fragment(href));
    }
    LinkTarget::Relative
}

fn strip_query_and_fragment(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = &path[..end];
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Number of `<a>` tags inside the related-articles block, or `None` when the
/// page has no related-articles marker at all.
pub fn related_link_count(html: &str, markers: &[String]) -> Option<usize> {
    let lowered = html.to_ascii_lowercase();
    let start = markers
        .iter()
        .filter_map(|marker| lowered.find(&marker.to_ascii_lowercase()))
        .min()?;
    let tail = &lowered[start..];

    let section = match tail.find("</section>") {
        Some(end) if end > 0 => &tail[..end + "</section>".len()],
        _ => match tail.find("</footer>") {
            Some(end) if end > 0 => &tail[..end],
            _ => head_chars(tail, RELATED_FALLBACK_CHARS),
        },
    };

    Some(
        section
            .match_indices("<a")
            .filter(|(index, _)| {
                section[index + 2..]
                    .chars()
                    .next()
                    .is_some_and(char::is_whitespace)
            })
            .count(),
    )
}

#[derive(Debug, Default)]
struct LinkTally {
    affiliate_issues: Vec<String>,
    nofollow_internal: usize,
    missing_trailing_slash: usize,
}

pub fn evaluate(ctx: &AuditContext, site: &Site) -> Vec<CheckResult> {
    if site.is_empty() {
        return vec![missing_build_output("4", ctx)];
    }

    let config = &ctx.config;
    let mut graph = LinkGraph::new(site.urls());
    let mut tally = LinkTally::default();

    for page in &site.pages {
        for anchor in &page.facts.anchors {
            match classify_href(&anchor.href, config) {
                LinkTarget::Affiliate => {
                    let compliant = ["nofollow", "sponsored", "noopener"]
                        .iter()
                        .all(|token| anchor.has_rel(token));
                    if !compliant {
                        tally.affiliate_issues.push(format!(
                            "{}: missing rel attrs on {}",
                            page.url, anchor.href
                        ));
                    }
                }
                LinkTarget::Internal(path) => {
                    let (resolved, appended) = normalize_internal_href(&path);
                    if appended {
                        tally.missing_trailing_slash += 1;
                    }
                    if anchor.has_rel("nofollow") {
                        tally.nofollow_internal += 1;
                    }
                    graph.add_edge(&page.url, &resolved);
                }
                LinkTarget::Ignored | LinkTarget::External | LinkTarget::Relative => {}
            }
        }
    }

    let orphans = graph.orphans(&config.orphan_exempt_urls);
    let mut broken = Vec::new();
    for url in site.urls() {
        for target in graph.outbound(url).into_iter().flatten() {
            if !graph.contains(target) && !config.is_asset_path(target) {
                broken.push(format!("{url} -> {target}"));
            }
        }
    }

    let mut missing_related = Vec::new();
    let mut thin_related = Vec::new();
    let mut content_pages = 0;
    for page in &site.pages {
        if config.pages.classify(&page.url).is_structural() {
            continue;
        }
        content_pages += 1;
        match related_link_count(&page.html, &config.related_markers) {
            None => missing_related.push(page.url.clone()),
            Some(count) if count < config.related_min_links => thin_related.push(format!(
                "{} ({count} links, need {})",
                page.url, config.related_min_links
            )),
            Some(_) => {}
        }
    }

    let mut checks = Vec::new();

    checks.push(CheckResult::gate(
        "4.1.no-orphans",
        format!("Zero orphan pages ({} found)", orphans.len()),
        orphans.is_empty(),
        CheckStatus::Fail,
        "All pages have inbound links",
        format!("Orphans: {}", join_examples(&orphans, ORPHAN_EXAMPLES, ", ")),
    ));

    checks.push(CheckResult::gate(
        "4.3.related-articles",
        format!(
            "Related articles present ({}/{content_pages} content pages)",
            content_pages - missing_related.len()
        ),
        missing_related.is_empty(),
        CheckStatus::Fail,
        "All content pages have related articles",
        format!(
            "Missing on: {}",
            join_examples(&missing_related, RELATED_MISSING_EXAMPLES, ", ")
        ),
    ));
    checks.push(CheckResult::gate(
        "4.3.related-count",
        format!(
            "Related articles have {} links each ({} issues)",
            config.related_min_links,
            thin_related.len()
        ),
        thin_related.is_empty(),
        CheckStatus::Warn,
        format!("All have {}+ links", config.related_min_links),
        format!("Issues: {}", join_examples(&thin_related, EXAMPLE_LIMIT, "; ")),
    ));

    checks.push(CheckResult::gate(
        "4.5.broken-links",
        format!("Zero broken internal links ({} found)", broken.len()),
        broken.is_empty(),
        CheckStatus::Fail,
        "All links resolve",
        format!("Broken: {}", join_examples(&broken, BROKEN_LINK_EXAMPLES, "; ")),
    ));
    checks.push(CheckResult::gate(
        "4.5.no-nofollow-internal",
        format!(
            "No nofollow on internal links ({} found)",
            tally.nofollow_internal
        ),
        tally.nofollow_internal == 0,
        CheckStatus::Warn,
        "Clean",
        format!("{} internal links with nofollow", tally.nofollow_internal),
    ));
    checks.push(CheckResult::gate(
        "4.5.trailing-slash",
        "All internal links have trailing slash",
        tally.missing_trailing_slash == 0,
        CheckStatus::Warn,
        "All correct",
        format!("{} missing trailing slash", tally.missing_trailing_slash),
    ));
    checks.push(CheckResult::gate(
        "4.5.affiliate-rel",
        format!(
            "Affiliate links have rel=\"nofollow sponsored noopener\" ({} issues)",
            tally.affiliate_issues.len()
        ),
        tally.affiliate_issues.is_empty(),
        CheckStatus::Fail,
        "All correct",
        join_examples(&tally.affiliate_issues, EXAMPLE_LIMIT, "; "),
    ));

    checks
}
