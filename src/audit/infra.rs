use std::fs;

use tracing::warn;

use crate::model::{CheckResult, CheckStatus};
use crate::util::tail_chars;

use super::AuditContext;
use super::runner::CommandRunner;
use super::site::discover_html_files;

const COMMAND_OUTPUT_TAIL_CHARS: usize = 500;
const LLMS_FILE: &str = "llms.txt";

pub fn evaluate(ctx: &AuditContext, runner: &dyn CommandRunner) -> Vec<CheckResult> {
    let mut checks = Vec::new();
    let config = &ctx.config;

    for command in &config.commands {
        let outcome = runner.run(&command.command);
        if !outcome.ok {
            warn!(
                id = %command.id,
                exit_code = ?outcome.exit_code,
                timed_out = outcome.timed_out,
                "build command failed"
            );
        }
        let detail = if outcome.ok {
            command.pass_detail.clone()
        } else if outcome.timed_out {
            format!(
                "Timed out after {}s\n{}",
                config.command_timeout_secs,
                tail_chars(&outcome.output, COMMAND_OUTPUT_TAIL_CHARS)
            )
        } else {
            tail_chars(&outcome.output, COMMAND_OUTPUT_TAIL_CHARS).to_string()
        };
        checks.push(CheckResult::new(
            command.id.as_str(),
            command.label.as_str(),
            CheckStatus::pass_or(outcome.ok, CheckStatus::Fail),
            detail,
        ));
    }

    for output in &config.build_outputs {
        let exists = ctx.dist.join(output).exists();
        checks.push(CheckResult::gate(
            format!("1.1.dist-{}", output.replace(['/', '.'], "-")),
            format!("{output} exists in build output"),
            exists,
            CheckStatus::Fail,
            "Found",
            "Missing",
        ));
    }

    if let Ok(llms) = fs::read_to_string(ctx.dist.join(LLMS_FILE)) {
        let clean = !llms.contains("undefined");
        checks.push(CheckResult::gate(
            "1.1.llms-no-undefined",
            "llms.txt has no \"undefined\" entries",
            clean,
            CheckStatus::Fail,
            "Clean",
            "Found \"undefined\" in llms.txt",
        ));
    }

    let count = discover_html_files(&ctx.dist).len();
    let page_count_status = if count >= config.page_count.pass_min {
        CheckStatus::Pass
    } else if count >= config.page_count.warn_min {
        CheckStatus::Warn
    } else {
        CheckStatus::Fail
    };
    checks.push(CheckResult::new(
        "1.1.page-count",
        format!(
            "Total page count ({count}) is {}+",
            config.page_count.pass_min
        ),
        page_count_status,
        format!("{count} HTML files in {}", ctx.dist.display()),
    ));

    let missing = config
        .source_inventory
        .iter()
        .filter(|file| !ctx.root.join(file).exists())
        .cloned()
        .collect::<Vec<String>>();
    let total = config.source_inventory.len();
    checks.push(CheckResult::gate(
        "1.2.file-inventory",
        format!("File inventory ({}/{total} present)", total - missing.len()),
        missing.is_empty(),
        CheckStatus::Fail,
        "All files present",
        format!("Missing: {}", missing.join(", ")),
    ));

    for probe in &config.config_probes {
        let Ok(contents) = fs::read_to_string(ctx.root.join(&probe.path)) else {
            continue;
        };
        let found = probe
            .any_of
            .iter()
            .any(|needle| contents.contains(needle.as_str()));
        checks.push(CheckResult::gate(
            probe.id.as_str(),
            probe.label.as_str(),
            found,
            probe.missing_status,
            format!("Found in {}", probe.path),
            format!("Missing from {}: expected one of {}", probe.path, probe.any_of.join(", ")),
        ));
    }

    checks
}
