use std::collections::HashSet;

use crate::model::{CheckResult, CheckStatus};
use crate::util::join_examples;

use super::site::Site;
use super::{AuditContext, EXAMPLE_LIMIT, missing_build_output};

#[derive(Debug, Default)]
struct SeoTally {
    titles: Vec<String>,
    metas: Vec<String>,
    canonicals: Vec<(String, String)>,
    missing_title: Vec<String>,
    missing_meta: Vec<String>,
    missing_canonical: Vec<String>,
    long_titles: Vec<String>,
    long_metas: Vec<String>,
    missing_h1: Vec<String>,
    multiple_h1: Vec<String>,
    skipped_levels: Vec<String>,
    missing_og_title: Vec<String>,
    missing_og_description: Vec<String>,
    missing_og_image: Vec<String>,
    missing_lang: Vec<String>,
    noindex: Vec<String>,
}

pub fn evaluate(ctx: &AuditContext, site: &Site) -> Vec<CheckResult> {
    if site.is_empty() {
        return vec![missing_build_output("2", ctx)];
    }

    let config = &ctx.config;
    let mut tally = SeoTally::default();

    for page in &site.pages {
        let facts = &page.facts;
        let url = page.url.clone();

        match facts.title.as_deref() {
            Some(title) => {
                if title.chars().count() > config.title_max_chars {
                    tally.long_titles.push(url.clone());
                }
                tally.titles.push(title.to_string());
            }
            None => tally.missing_title.push(url.clone()),
        }

        match facts.description() {
            Some(description) => {
                if description.chars().count() > config.meta_description_max_chars {
                    tally.long_metas.push(url.clone());
                }
                tally.metas.push(description.to_string());
            }
            None => tally.missing_meta.push(url.clone()),
        }

        match facts.canonical.as_deref() {
            Some(canonical) => tally.canonicals.push((url.clone(), canonical.to_string())),
            None => tally.missing_canonical.push(url.clone()),
        }

        match facts.h1_count() {
            0 => tally.missing_h1.push(url.clone()),
            1 => {}
            _ => tally.multiple_h1.push(url.clone()),
        }
        if facts.has_skipped_heading_level() {
            tally.skipped_levels.push(url.clone());
        }

        if facts.meta("og:title").is_none() {
            tally.missing_og_title.push(url.clone());
        }
        if facts.meta("og:description").is_none() {
            tally.missing_og_description.push(url.clone());
        }
        if facts.meta("og:image").is_none() {
            tally.missing_og_image.push(url.clone());
        }

        let lang_ok = facts
            .html_lang
            .as_deref()
            .is_some_and(|lang| lang.eq_ignore_ascii_case(&config.expected_lang));
        if !lang_ok {
            tally.missing_lang.push(url.clone());
        }
        if facts.has_noindex() {
            tally.noindex.push(url);
        }
    }

    let mut checks = Vec::new();

    checks.push(CheckResult::gate(
        "2.1.has-title",
        "Every page has a <title> tag",
        tally.missing_title.is_empty(),
        CheckStatus::Fail,
        "All pages have titles",
        pages_detail(&tally.missing_title, "missing title"),
    ));
    let duplicate_titles = duplicate_count(&tally.titles);
    checks.push(CheckResult::gate(
        "2.1.unique-titles",
        "No duplicate titles",
        duplicate_titles == 0,
        CheckStatus::Fail,
        "All unique",
        format!("{duplicate_titles} duplicate titles"),
    ));
    checks.push(CheckResult::gate(
        "2.1.title-length",
        format!("All titles under {} characters", config.title_max_chars),
        tally.long_titles.is_empty(),
        CheckStatus::Warn,
        "All within limit",
        format!(
            "{} titles over {} chars: {}",
            tally.long_titles.len(),
            config.title_max_chars,
            join_examples(&tally.long_titles, EXAMPLE_LIMIT, ", ")
        ),
    ));

    checks.push(CheckResult::gate(
        "2.2.has-meta",
        "Every page has a meta description",
        tally.missing_meta.is_empty(),
        CheckStatus::Fail,
        "All pages have descriptions",
        pages_detail(&tally.missing_meta, "missing"),
    ));
    let duplicate_metas = duplicate_count(&tally.metas);
    checks.push(CheckResult::gate(
        "2.2.unique-metas",
        "No duplicate meta descriptions",
        duplicate_metas == 0,
        CheckStatus::Fail,
        "All unique",
        format!("{duplicate_metas} duplicates"),
    ));
    checks.push(CheckResult::gate(
        "2.2.meta-length",
        format!(
            "All meta descriptions under {} chars",
            config.meta_description_max_chars
        ),
        tally.long_metas.is_empty(),
        CheckStatus::Warn,
        "All within limit",
        format!(
            "{} over {} chars: {}",
            tally.long_metas.len(),
            config.meta_description_max_chars,
            join_examples(&tally.long_metas, EXAMPLE_LIMIT, ", ")
        ),
    ));

    let h1_ok = tally.missing_h1.is_empty() && tally.multiple_h1.is_empty();
    let mut h1_detail = format!(
        "{} missing H1, {} with multiple H1s",
        tally.missing_h1.len(),
        tally.multiple_h1.len()
    );
    if !h1_ok {
        let offenders = [tally.missing_h1.as_slice(), tally.multiple_h1.as_slice()].concat();
        h1_detail.push_str(&format!(": {}", join_examples(&offenders, EXAMPLE_LIMIT, ", ")));
    }
    checks.push(CheckResult::new(
        "2.3.h1-present",
        "Every page has exactly one H1",
        CheckStatus::pass_or(h1_ok, CheckStatus::Fail),
        h1_detail,
    ));
    checks.push(CheckResult::gate(
        "2.3.no-skipped",
        "No skipped heading levels",
        tally.skipped_levels.is_empty(),
        CheckStatus::Warn,
        "Hierarchy intact",
        pages_detail(&tally.skipped_levels, "with skipped levels"),
    ));

    checks.push(CheckResult::gate(
        "2.4.has-canonical",
        "Every page has a canonical URL",
        tally.missing_canonical.is_empty(),
        CheckStatus::Fail,
        "All present",
        pages_detail(&tally.missing_canonical, "missing"),
    ));
    let non_absolute = tally
        .canonicals
        .iter()
        .filter(|(_, canonical)| !canonical.starts_with("https://"))
        .map(|(url, _)| url.clone())
        .collect::<Vec<String>>();
    checks.push(CheckResult::gate(
        "2.4.absolute-canonical",
        "Canonical URLs are absolute (https://)",
        non_absolute.is_empty(),
        CheckStatus::Fail,
        "All absolute",
        pages_detail(&non_absolute, "non-absolute"),
    ));
    let no_trailing_slash = tally
        .canonicals
        .iter()
        .filter(|(_, canonical)| !canonical.ends_with('/'))
        .map(|(url, _)| url.clone())
        .collect::<Vec<String>>();
    checks.push(CheckResult::gate(
        "2.4.trailing-slash",
        "Canonical URLs have trailing slash",
        no_trailing_slash.is_empty(),
        CheckStatus::Fail,
        "All have trailing slash",
        pages_detail(&no_trailing_slash, "missing trailing slash"),
    ));

    for (id, property, missing) in [
        ("2.5.og-title", "og:title", &tally.missing_og_title),
        ("2.5.og-desc", "og:description", &tally.missing_og_description),
        ("2.5.og-image", "og:image", &tally.missing_og_image),
    ] {
        checks.push(CheckResult::gate(
            id,
            format!("Every page has {property}"),
            missing.is_empty(),
            CheckStatus::Fail,
            "All present",
            pages_detail(missing, "missing"),
        ));
    }

    checks.push(CheckResult::gate(
        "2.6.lang",
        format!("html lang=\"{}\" on every page", config.expected_lang),
        tally.missing_lang.is_empty(),
        CheckStatus::Fail,
        "All present",
        pages_detail(&tally.missing_lang, "missing lang"),
    ));
    checks.push(CheckResult::gate(
        "2.6.noindex",
        "No noindex on content pages",
        tally.noindex.is_empty(),
        CheckStatus::Fail,
        "None found",
        pages_detail(&tally.noindex, "with noindex"),
    ));

    checks
}

/// Number of values beyond the first occurrence of each distinct value.
pub fn duplicate_count(values: &[String]) -> usize {
    let distinct = values.iter().collect::<HashSet<&String>>().len();
    values.len() - distinct
}

fn pages_detail(urls: &[String], what: &str) -> String {
    format!(
        "{} pages {what}: {}",
        urls.len(),
        join_examples(urls, EXAMPLE_LIMIT, ", ")
    )
}
