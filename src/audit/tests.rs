use std::fs;
use std::path::Path;
use std::sync::Mutex;

use super::extract::{HtmlExtractor, JsonLdBlock};
use super::link_graph::LinkGraph;
use super::linking::{LinkTarget, classify_href, related_link_count};
use super::runner::{CommandOutcome, CommandRunner};
use super::site::{Site, normalize_page_url};
use super::*;
use crate::config::AuditConfig;
use crate::model::{CheckResult, CheckStatus};
use crate::store::ResultsStore;

struct FakeRunner {
    outcomes: Mutex<Vec<CommandOutcome>>,
    seen: Mutex<Vec<String>>,
}

impl FakeRunner {
    fn succeeding() -> Self {
        Self::with_outcomes(Vec::new())
    }

    /// Outcomes are handed out in command order; once exhausted every
    /// command succeeds.
    fn with_outcomes(mut outcomes: Vec<CommandOutcome>) -> Self {
        outcomes.reverse();
        Self {
            outcomes: Mutex::new(outcomes),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &str) -> CommandOutcome {
        self.seen
            .lock()
            .expect("seen lock")
            .push(command.to_string());
        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop()
            .unwrap_or(CommandOutcome {
                ok: true,
                exit_code: Some(0),
                ..CommandOutcome::default()
            })
    }
}

fn write_page(dist: &Path, relative: &str, html: &str) {
    let path = dist.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create page directory");
    }
    fs::write(path, html).expect("write page");
}

fn page_html(title: &str, description: &str, canonical_path: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<title>{title}</title>
<meta name="description" content="{description}">
<link rel="canonical" href="https://offgridfilters.com{canonical_path}">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:image" content="https://offgridfilters.com/og.png">
</head>
<body>
{body}
</body>
</html>"#
    )
}

fn context(root: &Path) -> AuditContext {
    let dist = root.join("dist");
    AuditContext::new(root, &dist, AuditConfig::default()).expect("audit context")
}

fn site_for(ctx: &AuditContext) -> Site {
    Site::load(&ctx.dist, &ctx.extractor)
}

fn find<'a>(checks: &'a [CheckResult], id: &str) -> &'a CheckResult {
    checks
        .iter()
        .find(|check| check.id == id)
        .unwrap_or_else(|| panic!("missing check {id}"))
}

#[test]
fn page_url_normalization_is_idempotent() {
    for (file, url) in [
        ("index.html", "/"),
        ("a/index.html", "/a/"),
        ("guides/water.html", "/guides/water/"),
        ("reviews/berkey/index.html", "/reviews/berkey/"),
    ] {
        let normalized = normalize_page_url(file);
        assert_eq!(normalized, url);
        assert_eq!(normalize_page_url(&normalized), normalized);
    }
}

#[test]
fn first_title_wins_and_blank_titles_are_absent() {
    let extractor = HtmlExtractor::new().expect("extractor");
    let facts = extractor.extract("<title> First </title><svg><title>Second</title></svg>");
    assert_eq!(facts.title.as_deref(), Some("First"));

    let blank = extractor.extract("<title>   </title>");
    assert_eq!(blank.title, None);
}

#[test]
fn meta_tags_match_in_either_attribute_order() {
    let extractor = HtmlExtractor::new().expect("extractor");
    let facts = extractor.extract(
        r#"<meta content="Reversed order" name="description"><meta property="og:title" content="OG">"#,
    );
    assert_eq!(facts.description(), Some("Reversed order"));
    assert_eq!(facts.meta("og:title"), Some("OG"));
    assert_eq!(facts.meta("og:image"), None);
}

#[test]
fn invalid_json_ld_yields_one_parse_error() {
    let extractor = HtmlExtractor::new().expect("extractor");
    let facts = extractor.extract(
        r#"<script type="application/ld+json">{"@type": "Product",</script>
<script type="application/ld+json">{"@type": "Article"}</script>"#,
    );

    let errors = facts
        .json_ld
        .iter()
        .filter(|block| matches!(block, JsonLdBlock::ParseError { .. }))
        .count();
    assert_eq!(errors, 1);
    assert_eq!(facts.json_ld.len(), 2);
}

#[test]
fn headings_keep_levels_and_strip_inner_tags() {
    let extractor = HtmlExtractor::new().expect("extractor");
    let facts = extractor.extract(
        r#"<h1 class="hero">Best <em>filters</em></h1><h2>Why</h2><h4>Skipped</h4>"#,
    );

    assert_eq!(facts.h1_count(), 1);
    assert_eq!(facts.headings[0].text, "Best filters");
    assert!(facts.has_skipped_heading_level());
}

#[test]
fn word_count_ignores_scripts_styles_and_entities() {
    let extractor = HtmlExtractor::new().expect("extractor");
    let count = extractor.count_words(
        "<style>p { color: red }</style><p>Clean&nbsp;water for\neveryone</p><script>var a = 1;</script>",
    );
    assert_eq!(count, 4);
}

#[test]
fn anchors_capture_rel_tokens() {
    let extractor = HtmlExtractor::new().expect("extractor");
    let facts = extractor.extract(
        r#"<a data-x="1" href="https://amzn.to/x" rel="Nofollow sponsored" target="_blank">Buy</a>"#,
    );

    let anchor = &facts.anchors[0];
    assert_eq!(anchor.href, "https://amzn.to/x");
    assert!(anchor.has_rel("nofollow"));
    assert!(!anchor.has_rel("noopener"));
    assert_eq!(anchor.target, "_blank");
}

#[test]
fn hrefs_are_classified_by_destination() {
    let config = AuditConfig::default();
    assert_eq!(classify_href("#top", &config), LinkTarget::Ignored);
    assert_eq!(classify_href("mailto:hi@example.com", &config), LinkTarget::Ignored);
    assert_eq!(classify_href("https://www.amazon.com/dp/1", &config), LinkTarget::Affiliate);
    assert_eq!(classify_href("https://example.org/", &config), LinkTarget::External);
    assert_eq!(classify_href("../sibling/", &config), LinkTarget::Relative);
    assert_eq!(
        classify_href("/guides/?ref=nav#top", &config),
        LinkTarget::Internal("/guides/".to_string())
    );
    assert_eq!(
        classify_href("https://offgridfilters.com/reviews/berkey/", &config),
        LinkTarget::Internal("/reviews/berkey/".to_string())
    );
    assert_eq!(
        classify_href("https://offgridfilters.com", &config),
        LinkTarget::Internal("/".to_string())
    );
}

#[test]
fn self_links_do_not_count_as_inbound() {
    let mut graph = LinkGraph::new(["/", "/a/", "/b/"]);
    graph.add_edge("/", "/a/");
    graph.add_edge("/b/", "/b/");
    graph.add_edge("/a/", "/missing/");

    assert_eq!(graph.orphans(&["/".to_string()]), vec!["/b/".to_string()]);
    assert!(graph.outbound("/a/").is_some_and(|targets| targets.contains("/missing/")));
    assert!(!graph.contains("/missing/"));
}

#[test]
fn related_block_counts_links_until_section_end() {
    let markers = AuditConfig::default().related_markers;
    let html = r#"<main>x</main><section data-related-articles><a href="/a/">A</a><a href="/b/">B</a><abbr>c</abbr></section><a href="/c/">C</a>"#;
    assert_eq!(related_link_count(html, &markers), Some(2));
    assert_eq!(related_link_count("<main>no block</main>", &markers), None);
}

#[test]
fn three_h1_headings_fail_the_h1_check() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    write_page(
        &ctx.dist,
        "index.html",
        &page_html("Home", "Home page", "/", "<h1>One</h1><h1>Two</h1><h1>Three</h1>"),
    );

    let checks = seo::evaluate(&ctx, &site_for(&ctx));
    let h1 = find(&checks, "2.3.h1-present");
    assert_eq!(h1.status, CheckStatus::Fail);
    assert!(h1.detail.starts_with("0 missing H1, 1 with multiple H1s"));
}

#[test]
fn duplicate_titles_are_counted_beyond_first_occurrence() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    write_page(&ctx.dist, "index.html", &page_html("Same", "First", "/", "<h1>A</h1>"));
    write_page(&ctx.dist, "b/index.html", &page_html("Same", "Second", "/b/", "<h1>B</h1>"));

    let checks = seo::evaluate(&ctx, &site_for(&ctx));
    let unique = find(&checks, "2.1.unique-titles");
    assert_eq!(unique.status, CheckStatus::Fail);
    assert_eq!(unique.detail, "1 duplicate titles");
    assert_eq!(find(&checks, "2.2.unique-metas").status, CheckStatus::Pass);
}

#[test]
fn unlinked_page_is_reported_as_orphan() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    write_page(
        &ctx.dist,
        "index.html",
        &page_html("Home", "Home", "/", r#"<a href="/a/">A</a>"#),
    );
    write_page(&ctx.dist, "a/index.html", &page_html("A", "A", "/a/", r#"<a href="/a/">self</a>"#));
    write_page(&ctx.dist, "b/index.html", &page_html("B", "B", "/b/", r#"<a href="/b">self</a>"#));

    let checks = linking::evaluate(&ctx, &site_for(&ctx));
    let orphans = find(&checks, "4.1.no-orphans");
    assert_eq!(orphans.status, CheckStatus::Fail);
    assert_eq!(orphans.detail, "Orphans: /b/");
    assert_eq!(find(&checks, "4.5.trailing-slash").status, CheckStatus::Warn);
    assert_eq!(find(&checks, "4.5.broken-links").status, CheckStatus::Pass);
}

#[test]
fn affiliate_links_need_every_rel_token() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    let compliant = r#"<a href="https://amzn.to/abc" rel="nofollow sponsored noopener">Buy</a>"#;
    write_page(&ctx.dist, "index.html", &page_html("Home", "Home", "/", compliant));

    let checks = linking::evaluate(&ctx, &site_for(&ctx));
    let affiliate = find(&checks, "4.5.affiliate-rel");
    assert_eq!(affiliate.status, CheckStatus::Pass);
    assert!(affiliate.label.contains("(0 issues)"));

    let missing_token = r#"<a href="https://amzn.to/abc" rel="nofollow sponsored">Buy</a>"#;
    write_page(&ctx.dist, "index.html", &page_html("Home", "Home", "/", missing_token));

    let checks = linking::evaluate(&ctx, &site_for(&ctx));
    let affiliate = find(&checks, "4.5.affiliate-rel");
    assert_eq!(affiliate.status, CheckStatus::Fail);
    assert!(affiliate.label.contains("(1 issues)"));
    assert_eq!(affiliate.detail, "/: missing rel attrs on https://amzn.to/abc");
}

#[test]
fn missing_build_output_yields_single_failure_per_section() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    let site = site_for(&ctx);
    assert!(site.is_empty());

    type Evaluator = fn(&AuditContext, &Site) -> Vec<CheckResult>;
    let sections: [(&str, Evaluator); 4] = [
        ("2", seo::evaluate),
        ("3", schema::evaluate),
        ("4", linking::evaluate),
        ("5", content::evaluate),
    ];
    for (section_id, evaluate) in sections {
        let checks = evaluate(&ctx, &site);
        assert_eq!(checks.len(), 1, "section {section_id}");
        assert_eq!(checks[0].id, format!("{section_id}.0.no-dist"));
        assert_eq!(checks[0].status, CheckStatus::Fail);
    }
}

#[test]
fn failed_commands_report_the_output_tail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    let long_output = format!("{}{}", "a".repeat(300), "b".repeat(500));
    let runner = FakeRunner::with_outcomes(vec![
        CommandOutcome::default(),
        CommandOutcome {
            ok: false,
            output: long_output,
            exit_code: Some(1),
            timed_out: false,
        },
        CommandOutcome {
            ok: false,
            output: "still running".to_string(),
            exit_code: None,
            timed_out: true,
        },
    ]);

    let checks = infra::evaluate(&ctx, &runner);

    let install = find(&checks, "1.1.npm-install");
    assert_eq!(install.status, CheckStatus::Fail);

    let lint = find(&checks, "1.1.npm-lint");
    assert_eq!(lint.status, CheckStatus::Fail);
    assert_eq!(lint.detail, "b".repeat(500));

    let test = find(&checks, "1.1.npm-test");
    assert_eq!(test.status, CheckStatus::Fail);
    assert!(test.detail.starts_with("Timed out after 300s"));

    assert_eq!(find(&checks, "1.1.npm-build").status, CheckStatus::Pass);
    assert_eq!(runner.seen.lock().expect("seen lock").len(), 4);
}

#[test]
fn build_outputs_and_page_count_follow_the_dist_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    write_page(&ctx.dist, "index.html", "<html></html>");
    write_page(&ctx.dist, "llms.txt", "- [Guide](undefined)");

    let checks = infra::evaluate(&ctx, &FakeRunner::succeeding());

    assert_eq!(find(&checks, "1.1.dist-index-html").status, CheckStatus::Pass);
    assert_eq!(find(&checks, "1.1.dist-robots-txt").status, CheckStatus::Fail);
    assert_eq!(find(&checks, "1.1.llms-no-undefined").status, CheckStatus::Fail);
    assert_eq!(find(&checks, "1.1.page-count").status, CheckStatus::Fail);
}

#[test]
fn clean_two_page_site_only_fails_related_articles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    write_page(
        &ctx.dist,
        "index.html",
        &page_html(
            "Off-grid water filters",
            "Independent water filter reviews.",
            "/",
            r#"<h1>Water filters</h1><a href="/a/">Read A</a>"#,
        ),
    );
    write_page(
        &ctx.dist,
        "a/index.html",
        &page_html(
            "Filter A",
            "A detailed look at filter A.",
            "/a/",
            r#"<h1>Filter A</h1><h2>Specs</h2>
<script type="application/ld+json">{"@context": "https://schema.org", "@type": "Product", "name": "Filter A"}</script>"#,
        ),
    );

    let site = site_for(&ctx);
    assert_eq!(site.urls().collect::<Vec<_>>(), vec!["/", "/a/"]);

    let mut failures = Vec::new();
    for checks in [
        seo::evaluate(&ctx, &site),
        schema::evaluate(&ctx, &site),
        linking::evaluate(&ctx, &site),
    ] {
        failures.extend(
            checks
                .into_iter()
                .filter(|check| check.status == CheckStatus::Fail),
        );
    }

    assert_eq!(failures.len(), 1, "unexpected failures: {failures:?}");
    assert_eq!(failures[0].id, "4.3.related-articles");
    assert_eq!(failures[0].detail, "Missing on: /a/");
}

#[test]
fn full_run_saves_every_automated_section() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    write_page(
        &ctx.dist,
        "index.html",
        &page_html("Home", "Home", "/", "<h1>Home</h1>"),
    );
    let store = ResultsStore::new(dir.path().join("checklist-results.json"));

    let document = run_all_automated(&ctx, &FakeRunner::succeeding(), &store).expect("run");

    assert!(document.last_run.is_some());
    for section_id in ["1", "2", "3", "4", "5"] {
        assert!(!document.section(section_id).is_empty(), "section {section_id}");
    }
    assert_eq!(store.load(), document);
}

#[test]
fn quoted_values_keep_the_other_quote_character() {
    let extractor = HtmlExtractor::new().expect("extractor");
    let facts = extractor.extract(
        r#"<html lang='en'><meta name="description" content="Berkey's gravity filter, tested for a month.">
<meta content='The "travel" bottle' property='og:title'>
<link href="https://offgridfilters.com/reviews/berkey's/" rel="canonical">
<a href='/guides/' rel='nofollow'>Guides</a>"#,
    );

    assert_eq!(
        facts.description(),
        Some("Berkey's gravity filter, tested for a month.")
    );
    assert_eq!(facts.meta("og:title"), Some(r#"The "travel" bottle"#));
    assert_eq!(
        facts.canonical.as_deref(),
        Some("https://offgridfilters.com/reviews/berkey's/")
    );
    assert_eq!(facts.html_lang.as_deref(), Some("en"));
    assert_eq!(facts.anchors[0].href, "/guides/");
    assert!(facts.anchors[0].has_rel("nofollow"));
}

#[test]
fn descriptions_sharing_a_possessive_prefix_stay_distinct() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    write_page(
        &ctx.dist,
        "index.html",
        &page_html("Home", "Berkey's gravity filter, tested for a month.", "/", "<h1>A</h1>"),
    );
    write_page(
        &ctx.dist,
        "b/index.html",
        &page_html("B", "Berkey's travel bottle compared with rivals.", "/b/", "<h1>B</h1>"),
    );

    let checks = seo::evaluate(&ctx, &site_for(&ctx));
    assert_eq!(find(&checks, "2.2.unique-metas").status, CheckStatus::Pass);
}

#[test]
fn pages_are_ordered_by_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    for file in ["index.html", "a/index.html", "guides/index.html", "about.html"] {
        write_page(&ctx.dist, file, "<html></html>");
    }

    let site = site_for(&ctx);
    assert_eq!(
        site.urls().collect::<Vec<_>>(),
        vec!["/", "/a/", "/about/", "/guides/"]
    );
}

#[test]
fn content_checks_follow_page_classes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    let disclosure = "<p>As an Amazon Associate we earn from qualifying purchases.</p>";
    write_page(
        &ctx.dist,
        "index.html",
        &page_html("Home", "Home", "/", disclosure),
    );
    write_page(
        &ctx.dist,
        "guides/index.html",
        &page_html("Guides", "All guides", "/guides/", "<h1>Guides</h1>"),
    );
    write_page(
        &ctx.dist,
        "guides/water/index.html",
        &page_html(
            "Water storage",
            "Storing water",
            "/guides/water/",
            &format!(
                r#"<div class="product-image"></div>{disclosure}<p>{}</p>"#,
                "water ".repeat(2100)
            ),
        ),
    );
    write_page(
        &ctx.dist,
        "reviews/berkey/index.html",
        &page_html(
            "Berkey review",
            "Berkey",
            "/reviews/berkey/",
            "<h1>Berkey</h1><p>Lorem ipsum dolor sit amet.</p>",
        ),
    );

    let checks = content::evaluate(&ctx, &site_for(&ctx));

    let placeholder = find(&checks, "5.1.no-placeholder");
    assert_eq!(placeholder.status, CheckStatus::Fail);
    assert_eq!(placeholder.detail, "Found on: /reviews/berkey/");

    let length = find(&checks, "5.1.content-length");
    assert_eq!(length.status, CheckStatus::Warn);
    assert!(length.detail.starts_with("Thin: /reviews/berkey/ ("));
    assert!(length.detail.ends_with("need 1500+)"));
    assert!(!length.detail.contains("/guides/"));

    let image = find(&checks, "5.1.product-image");
    assert_eq!(image.status, CheckStatus::Warn);
    assert_eq!(image.detail, "1 pages without ProductImage: /reviews/berkey/");

    let cons = find(&checks, "5.2.reviews-have-cons");
    assert_eq!(cons.status, CheckStatus::Fail);
    assert_eq!(cons.detail, "Missing: /reviews/berkey/");

    let disclosure_check = find(&checks, "5.4.affiliate-disclosure");
    assert_eq!(disclosure_check.status, CheckStatus::Fail);
    assert!(disclosure_check.label.ends_with("(2/4)"));
}

#[test]
fn disclosure_passes_at_exactly_ninety_five_percent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    for index in 0..20 {
        let body = if index < 19 { "Amazon Associate" } else { "no notice" };
        write_page(&ctx.dist, &format!("p{index}/index.html"), body);
    }

    let checks = content::evaluate(&ctx, &site_for(&ctx));
    assert_eq!(find(&checks, "5.4.affiliate-disclosure").status, CheckStatus::Pass);

    write_page(&ctx.dist, "p18/index.html", "no notice");
    let checks = content::evaluate(&ctx, &site_for(&ctx));
    assert_eq!(find(&checks, "5.4.affiliate-disclosure").status, CheckStatus::Fail);
}

#[test]
fn schema_quality_checks_walk_graphs_and_type_arrays() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    write_page(
        &ctx.dist,
        "index.html",
        r#"<script type="application/ld+json">{
  "@context": "https://schema.org",
  "@graph": [
    {"@type": ["Article", "NewsArticle"], "datePublished": "2026-01-01", "author": "undefined", "about": null},
    {"@type": "WebSite", "potentialAction": {"@type": "SearchAction", "target": "/search?q={q}"}},
    {"@type": "BreadcrumbList", "itemListElement": []}
  ]
}</script>"#,
    );
    write_page(
        &ctx.dist,
        "reviews/berkey/index.html",
        r#"<script type="application/ld+json">{"@context": "https://schema.org", "@type": ["Product", "Thing"], "name": "Berkey"}</script>"#,
    );
    write_page(&ctx.dist, "reviews/katadyn/index.html", "<p>No markup</p>");

    let checks = schema::evaluate(&ctx, &site_for(&ctx));

    let coverage = find(&checks, "3.1.schemas-present");
    assert_eq!(coverage.status, CheckStatus::Warn);
    assert_eq!(coverage.detail, "2 of 3 pages have JSON-LD");

    let product = find(&checks, "3.1.product-schema");
    assert_eq!(product.status, CheckStatus::Fail);
    assert!(product.label.ends_with("(1/2)"));
    assert!(product.detail.ends_with("missing on: /reviews/katadyn/"));

    assert_eq!(find(&checks, "3.1.breadcrumb-schema").status, CheckStatus::Pass);
    assert_eq!(find(&checks, "3.1.faq-schema").status, CheckStatus::Warn);
    assert_eq!(find(&checks, "3.2.parse-errors").status, CheckStatus::Pass);

    let undefined = find(&checks, "3.2.no-undefined");
    assert_eq!(undefined.status, CheckStatus::Fail);
    assert_eq!(undefined.detail, "1 undefined values");

    let null = find(&checks, "3.2.no-null");
    assert_eq!(null.status, CheckStatus::Warn);
    assert_eq!(null.detail, "1 null values");

    let search = find(&checks, "3.2.no-search-action");
    assert_eq!(search.status, CheckStatus::Fail);
    assert_eq!(search.detail, "1 SearchAction(s) found");

    let dates = find(&checks, "3.2.article-dates");
    assert_eq!(dates.status, CheckStatus::Fail);
    assert!(dates.label.ends_with("(0/1)"));
    assert!(dates.detail.ends_with("missing on: /"));

    assert_eq!(find(&checks, "3.2.entity-linking").status, CheckStatus::Warn);
}

#[test]
fn schema_coverage_must_be_strictly_above_the_ratio() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    let marked = r#"<script type="application/ld+json">{"@type": "WebPage"}</script>"#;
    for index in 0..4 {
        write_page(&ctx.dist, &format!("p{index}/index.html"), marked);
    }
    write_page(&ctx.dist, "p4/index.html", "<p>plain</p>");

    let checks = schema::evaluate(&ctx, &site_for(&ctx));
    assert_eq!(find(&checks, "3.1.schemas-present").status, CheckStatus::Warn);

    write_page(&ctx.dist, "p4/index.html", marked);
    let checks = schema::evaluate(&ctx, &site_for(&ctx));
    assert_eq!(find(&checks, "3.1.schemas-present").status, CheckStatus::Pass);
}

#[test]
fn config_probes_run_only_for_present_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ctx = context(dir.path());
    fs::write(dir.path().join("package.json"), "{}").expect("write package.json");
    fs::write(
        dir.path().join("astro.config.mjs"),
        "export default defineConfig({ site: 'https://offgridfilters.com', output: 'static' });",
    )
    .expect("write astro config");

    let checks = infra::evaluate(&ctx, &FakeRunner::succeeding());

    assert_eq!(find(&checks, "1.3.astro-site").status, CheckStatus::Pass);
    assert_eq!(find(&checks, "1.3.astro-static").status, CheckStatus::Pass);
    let trailing = find(&checks, "1.3.astro-trailing");
    assert_eq!(trailing.status, CheckStatus::Fail);
    assert!(trailing.detail.contains("trailingSlash"));
    assert!(!checks.iter().any(|check| check.id.starts_with("1.3.vercel-")));

    let inventory = find(&checks, "1.2.file-inventory");
    assert_eq!(inventory.status, CheckStatus::Fail);
    assert!(inventory.label.ends_with("(2/46 present)"));
    assert!(inventory.detail.starts_with("Missing: tailwind.config.ts, tsconfig.json"));
    assert!(!inventory.detail.contains("package.json"));

    fs::write(
        dir.path().join("astro.config.mjs"),
        "export default defineConfig({ site: 'https://offgridfilters.com', trailingSlash: 'always' });",
    )
    .expect("rewrite astro config");
    let checks = infra::evaluate(&ctx, &FakeRunner::succeeding());
    assert_eq!(find(&checks, "1.3.astro-static").status, CheckStatus::Warn);
    assert_eq!(find(&checks, "1.3.astro-trailing").status, CheckStatus::Pass);
}
