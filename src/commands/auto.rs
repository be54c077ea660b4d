use std::process::ExitCode;

use anyhow::Result;
use tracing::info;

use crate::audit::run_all_automated;
use crate::checklist::AUTOMATED_SECTIONS;
use crate::cli::ProjectArgs;
use crate::model::{CheckStatus, ResultsDocument};

use super::{open_project, shell_runner};

pub fn run(project: &ProjectArgs) -> Result<ExitCode> {
    let (ctx, store) = open_project(project)?;
    info!(root = %ctx.root.display(), dist = %ctx.dist.display(), "automated run requested");

    let runner = shell_runner(&ctx);
    let document = run_all_automated(&ctx, &runner, &store)?;

    let lines = failure_lines(&document);
    if lines.is_empty() {
        println!("All automated checks passed.");
        return Ok(ExitCode::SUCCESS);
    }
    for line in &lines {
        println!("{line}");
    }
    Ok(ExitCode::FAILURE)
}

/// `[FAIL] S<n>: label` per failing check, each followed by its detail
/// indented two spaces per line.
pub fn failure_lines(document: &ResultsDocument) -> Vec<String> {
    let mut lines = Vec::new();
    for (section_id, _) in AUTOMATED_SECTIONS {
        for check in document.section(section_id) {
            if check.status != CheckStatus::Fail {
                continue;
            }
            lines.push(format!("[FAIL] S{section_id}: {}", check.label));
            lines.extend(check.detail.lines().map(|line| format!("  {line}")));
        }
    }
    lines
}
