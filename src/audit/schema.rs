use serde_json::Value;

use crate::config::PageClass;
use crate::model::{CheckResult, CheckStatus};
use crate::util::join_examples;

use super::extract::JsonLdBlock;
use super::site::Site;
use super::{AuditContext, EXAMPLE_LIMIT, missing_build_output};

#[derive(Debug, Default)]
struct SchemaTally {
    pages_with_schema: usize,
    parse_errors: Vec<String>,
    undefined_values: usize,
    null_values: usize,
    search_actions: usize,
    review_pages: usize,
    reviews_without_product: Vec<String>,
    faq: usize,
    breadcrumb: usize,
    item_list: usize,
    articles: usize,
    articles_with_dates: usize,
    articles_with_about: usize,
    articles_missing_dates: Vec<String>,
}

pub fn evaluate(ctx: &AuditContext, site: &Site) -> Vec<CheckResult> {
    if site.is_empty() {
        return vec![missing_build_output("3", ctx)];
    }

    let mut tally = SchemaTally::default();

    for page in &site.pages {
        let blocks = &page.facts.json_ld;
        if !blocks.is_empty() {
            tally.pages_with_schema += 1;
        }

        let is_review = ctx.config.pages.classify(&page.url) == PageClass::Review;
        let mut has_product = false;

        for block in blocks {
            let schema = match block {
                JsonLdBlock::Parsed(value) => value,
                JsonLdBlock::ParseError { .. } => {
                    tally.parse_errors.push(page.url.clone());
                    continue;
                }
            };

            let (undefined, null) = count_bad_values(schema);
            tally.undefined_values += undefined;
            tally.null_values += null;

            for entity in flatten_graph(schema) {
                if has_type(entity, "Product") {
                    has_product = true;
                }
                if has_type(entity, "FAQPage") {
                    tally.faq += 1;
                }
                if has_type(entity, "BreadcrumbList") {
                    tally.breadcrumb += 1;
                }
                if has_type(entity, "ItemList") {
                    tally.item_list += 1;
                }
                if has_type(entity, "Article") {
                    tally.articles += 1;
                    if is_present(entity.get("datePublished"))
                        && is_present(entity.get("dateModified"))
                    {
                        tally.articles_with_dates += 1;
                    } else {
                        tally.articles_missing_dates.push(page.url.clone());
                    }
                    if is_present(entity.get("about")) {
                        tally.articles_with_about += 1;
                    }
                }
                if mentions_search_action(entity) {
                    tally.search_actions += 1;
                }
            }
        }

        if is_review {
            tally.review_pages += 1;
            if !has_product {
                tally.reviews_without_product.push(page.url.clone());
            }
        }
    }

    let total_pages = site.len();
    let config = &ctx.config;
    let mut checks = Vec::new();

    checks.push(CheckResult::new(
        "3.1.schemas-present",
        format!(
            "Pages with schema markup ({}/{total_pages})",
            tally.pages_with_schema
        ),
        CheckStatus::pass_or(
            tally.pages_with_schema as f64 > total_pages as f64 * config.schema_min_ratio,
            CheckStatus::Warn,
        ),
        format!(
            "{} of {total_pages} pages have JSON-LD",
            tally.pages_with_schema
        ),
    ));

    let reviews_with_product = tally.review_pages - tally.reviews_without_product.len();
    let mut product_detail = format!(
        "{reviews_with_product} of {} reviews have Product schema",
        tally.review_pages
    );
    if !tally.reviews_without_product.is_empty() {
        product_detail.push_str(&format!(
            "; missing on: {}",
            join_examples(&tally.reviews_without_product, EXAMPLE_LIMIT, ", ")
        ));
    }
    checks.push(CheckResult::new(
        "3.1.product-schema",
        format!(
            "Product schema on review pages ({reviews_with_product}/{})",
            tally.review_pages
        ),
        CheckStatus::pass_or(tally.reviews_without_product.is_empty(), CheckStatus::Fail),
        product_detail,
    ));

    for (id, name, count) in [
        ("3.1.faq-schema", "FAQPage", tally.faq),
        ("3.1.breadcrumb-schema", "BreadcrumbList", tally.breadcrumb),
        ("3.1.itemlist-schema", "ItemList", tally.item_list),
    ] {
        checks.push(CheckResult::new(
            id,
            format!("{name} schemas found: {count}"),
            CheckStatus::pass_or(count > 0, CheckStatus::Warn),
            format!("{count} {name} schemas"),
        ));
    }

    checks.push(CheckResult::gate(
        "3.2.parse-errors",
        "All JSON-LD is valid JSON",
        tally.parse_errors.is_empty(),
        CheckStatus::Fail,
        "All parseable",
        format!(
            "{} parse errors: {}",
            tally.parse_errors.len(),
            join_examples(&tally.parse_errors, EXAMPLE_LIMIT, ", ")
        ),
    ));
    checks.push(CheckResult::gate(
        "3.2.no-undefined",
        "No undefined values in schema",
        tally.undefined_values == 0,
        CheckStatus::Fail,
        "Clean",
        format!("{} undefined values", tally.undefined_values),
    ));
    checks.push(CheckResult::gate(
        "3.2.no-null",
        "No null values in schema",
        tally.null_values == 0,
        CheckStatus::Warn,
        "Clean",
        format!("{} null values", tally.null_values),
    ));
    checks.push(CheckResult::gate(
        "3.2.no-search-action",
        "No SearchAction in any schema",
        tally.search_actions == 0,
        CheckStatus::Fail,
        "Clean",
        format!("{} SearchAction(s) found", tally.search_actions),
    ));

    let mut dates_detail = format!(
        "{} of {} have both datePublished and dateModified",
        tally.articles_with_dates, tally.articles
    );
    if !tally.articles_missing_dates.is_empty() {
        dates_detail.push_str(&format!(
            "; missing on: {}",
            join_examples(&tally.articles_missing_dates, EXAMPLE_LIMIT, ", ")
        ));
    }
    checks.push(CheckResult::new(
        "3.2.article-dates",
        format!(
            "Article schemas with per-page dates ({}/{})",
            tally.articles_with_dates, tally.articles
        ),
        CheckStatus::pass_or(
            tally.articles_with_dates >= tally.articles,
            CheckStatus::Fail,
        ),
        dates_detail,
    ));
    checks.push(CheckResult::new(
        "3.2.entity-linking",
        format!(
            "Article schemas with entity linking ({}/{})",
            tally.articles_with_about, tally.articles
        ),
        CheckStatus::pass_or(
            tally.articles_with_about as f64
                >= tally.articles as f64 * config.article_about_min_ratio,
            CheckStatus::Warn,
        ),
        format!(
            "{} of {} have about property",
            tally.articles_with_about, tally.articles
        ),
    ));

    checks
}

/// Entities inside a top-level `@graph` wrapper, or the schema itself.
pub fn flatten_graph(schema: &Value) -> Vec<&Value> {
    match schema.get("@graph") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) if single.is_object() => vec![single],
        _ => match schema {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        },
    }
}

pub fn has_type(entity: &Value, expected: &str) -> bool {
    match entity.get("@type") {
        Some(Value::String(value)) => value == expected,
        Some(Value::Array(values)) => values.iter().any(|value| value.as_str() == Some(expected)),
        _ => false,
    }
}

/// Counts string `"undefined"` values and JSON nulls anywhere in the tree.
pub fn count_bad_values(value: &Value) -> (usize, usize) {
    match value {
        Value::Null => (0, 1),
        Value::String(text) if text == "undefined" => (1, 0),
        Value::Array(items) => items.iter().map(count_bad_values).fold((0, 0), add_pairs),
        Value::Object(map) => map.values().map(count_bad_values).fold((0, 0), add_pairs),
        _ => (0, 0),
    }
}

fn add_pairs(left: (usize, usize), right: (usize, usize)) -> (usize, usize) {
    (left.0 + right.0, left.1 + right.1)
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Bool(flag)) => *flag,
        Some(_) => true,
    }
}

fn mentions_search_action(entity: &Value) -> bool {
    match entity {
        Value::String(text) => text.contains("SearchAction"),
        Value::Array(items) => items.iter().any(mentions_search_action),
        Value::Object(map) => map
            .iter()
            .any(|(key, value)| key.contains("SearchAction") || mentions_search_action(value)),
        _ => false,
    }
}
