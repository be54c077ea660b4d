use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use regex::Regex;
use tracing::info;

use crate::checklist::automated_title;
use crate::config::AuditConfig;
use crate::model::{CheckResult, CheckStatus, ResultsDocument, StatusTotals};
use crate::store::ResultsStore;

pub mod content;
pub mod extract;
pub mod infra;
pub mod link_graph;
pub mod linking;
pub mod runner;
pub mod schema;
pub mod seo;
pub mod site;
#[cfg(test)]
mod tests;

use self::extract::HtmlExtractor;
use self::runner::CommandRunner;
use self::site::Site;

pub const EXAMPLE_LIMIT: usize = 5;

/// Everything an audit run needs that stays fixed across runs: project
/// paths, site policy and compiled patterns.
#[derive(Debug)]
pub struct AuditContext {
    pub root: PathBuf,
    pub dist: PathBuf,
    pub config: AuditConfig,
    pub extractor: HtmlExtractor,
    pub placeholder_patterns: Vec<Regex>,
}

impl AuditContext {
    pub fn new(root: &Path, dist: &Path, config: AuditConfig) -> Result<Self> {
        let placeholder_patterns = config.compile_placeholder_patterns()?;
        Ok(Self {
            root: root.to_path_buf(),
            dist: dist.to_path_buf(),
            config,
            extractor: HtmlExtractor::new()?,
            placeholder_patterns,
        })
    }
}

pub fn missing_build_output(section_id: &str, ctx: &AuditContext) -> CheckResult {
    CheckResult::new(
        format!("{section_id}.0.no-dist"),
        "Build output exists",
        CheckStatus::Fail,
        format!(
            "No HTML files in {}. Run the site build first.",
            ctx.dist.display()
        ),
    )
}

/// Runs sections 1-5 in order, saving after each one so readers can follow
/// progress. Section 1 may rebuild the site, so the build output is read
/// afterwards and shared by sections 2-5.
pub fn run_all_automated(
    ctx: &AuditContext,
    runner: &dyn CommandRunner,
    store: &ResultsStore,
) -> Result<ResultsDocument> {
    let started_at = Instant::now();
    let mut document = store.load();

    info!(section = "1", title = automated_title("1"), "running section");
    let infra_checks = infra::evaluate(ctx, runner);
    record_section(store, &mut document, "1", infra_checks)?;

    let site = Site::load(&ctx.dist, &ctx.extractor);
    info!(pages = site.len(), dist = %ctx.dist.display(), "build output loaded");

    type Evaluator = fn(&AuditContext, &Site) -> Vec<CheckResult>;
    let sections: [(&str, Evaluator); 4] = [
        ("2", seo::evaluate),
        ("3", schema::evaluate),
        ("4", linking::evaluate),
        ("5", content::evaluate),
    ];
    for (section_id, evaluate) in sections {
        info!(section = section_id, title = automated_title(section_id), "running section");
        let checks = evaluate(ctx, &site);
        record_section(store, &mut document, section_id, checks)?;
    }

    let totals = document.totals();
    info!(
        elapsed_ms = started_at.elapsed().as_millis() as u64,
        passed = totals.pass,
        failed = totals.fail,
        warnings = totals.warn,
        results = %store.path().display(),
        "automated checks complete"
    );

    Ok(document)
}

fn record_section(
    store: &ResultsStore,
    document: &mut ResultsDocument,
    section_id: &str,
    checks: Vec<CheckResult>,
) -> Result<()> {
    let totals = StatusTotals::of(&checks);
    info!(
        section = section_id,
        passed = totals.pass,
        total = checks.len(),
        "section complete"
    );
    document.sections.insert(section_id.to_string(), checks);
    store.save(document)
}
