use regex::Regex;

use crate::config::PageClass;
use crate::model::{CheckResult, CheckStatus};
use crate::util::join_examples;

use super::site::Site;
use super::{AuditContext, EXAMPLE_LIMIT, missing_build_output};

#[derive(Debug, Default)]
struct ContentTally {
    placeholder_pages: Vec<String>,
    thin_pages: Vec<String>,
    missing_product_image: Vec<String>,
    reviews_without_cons: Vec<String>,
    pages_with_disclosure: usize,
}

pub fn evaluate(ctx: &AuditContext, site: &Site) -> Vec<CheckResult> {
    if site.is_empty() {
        return vec![missing_build_output("5", ctx)];
    }

    let config = &ctx.config;
    let mut tally = ContentTally::default();

    for page in &site.pages {
        let html = page.html.as_str();
        let class = config.pages.classify(&page.url);

        if first_placeholder(&ctx.placeholder_patterns, html).is_some() {
            tally.placeholder_pages.push(page.url.clone());
        }

        if let Some(floor) = config.word_floor(class) {
            let words = page.facts.word_count;
            if words < floor {
                tally
                    .thin_pages
                    .push(format!("{} ({words}w, need {floor}+)", page.url));
            }
        }

        if !class.is_structural() && !contains_any(html, &config.product_image_markers) {
            tally.missing_product_image.push(page.url.clone());
        }

        if class == PageClass::Review && !contains_any(html, &config.cons_markers) {
            tally.reviews_without_cons.push(page.url.clone());
        }

        if contains_any(html, &config.disclosure_markers) {
            tally.pages_with_disclosure += 1;
        }
    }

    let total_pages = site.len();
    let mut checks = Vec::new();

    checks.push(CheckResult::gate(
        "5.1.no-placeholder",
        format!(
            "No placeholder text remaining ({} found)",
            tally.placeholder_pages.len()
        ),
        tally.placeholder_pages.is_empty(),
        CheckStatus::Fail,
        "Clean",
        format!(
            "Found on: {}",
            join_examples(&tally.placeholder_pages, EXAMPLE_LIMIT, ", ")
        ),
    ));
    checks.push(CheckResult::gate(
        "5.1.content-length",
        format!(
            "Content length meets minimums ({} thin)",
            tally.thin_pages.len()
        ),
        tally.thin_pages.is_empty(),
        CheckStatus::Warn,
        "All substantial",
        format!(
            "Thin: {}",
            join_examples(&tally.thin_pages, EXAMPLE_LIMIT, "; ")
        ),
    ));
    checks.push(CheckResult::gate(
        "5.1.product-image",
        format!(
            "ProductImage on content pages ({} missing)",
            tally.missing_product_image.len()
        ),
        tally.missing_product_image.is_empty(),
        CheckStatus::Warn,
        "All present",
        format!(
            "{} pages without ProductImage: {}",
            tally.missing_product_image.len(),
            join_examples(&tally.missing_product_image, EXAMPLE_LIMIT, ", ")
        ),
    ));
    checks.push(CheckResult::gate(
        "5.2.reviews-have-cons",
        format!(
            "Every review has cons ({} missing)",
            tally.reviews_without_cons.len()
        ),
        tally.reviews_without_cons.is_empty(),
        CheckStatus::Fail,
        "All have cons",
        format!(
            "Missing: {}",
            join_examples(&tally.reviews_without_cons, EXAMPLE_LIMIT, ", ")
        ),
    ));
    checks.push(CheckResult::new(
        "5.4.affiliate-disclosure",
        format!(
            "Affiliate disclosure present ({}/{total_pages})",
            tally.pages_with_disclosure
        ),
        CheckStatus::pass_or(
            tally.pages_with_disclosure as f64
                >= total_pages as f64 * config.disclosure_min_ratio,
            CheckStatus::Fail,
        ),
        format!(
            "{} of {total_pages} pages have disclosure",
            tally.pages_with_disclosure
        ),
    ));

    checks
}

pub fn first_placeholder<'a>(patterns: &'a [Regex], html: &str) -> Option<&'a Regex> {
    patterns.iter().find(|pattern| pattern.is_match(html))
}

fn contains_any(html: &str, markers: &[String]) -> bool {
    markers.iter().any(|marker| html.contains(marker.as_str()))
}
