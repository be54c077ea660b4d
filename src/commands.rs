use std::time::Duration;

use anyhow::Result;

use crate::audit::AuditContext;
use crate::audit::runner::ShellRunner;
use crate::cli::ProjectArgs;
use crate::config::AuditConfig;
use crate::store::ResultsStore;

pub mod auto;
pub mod report;
pub mod serve;

pub fn open_project(project: &ProjectArgs) -> Result<(AuditContext, ResultsStore)> {
    let config = AuditConfig::load(&project.root, project.config.as_deref())?;
    let ctx = AuditContext::new(&project.root, &project.dist_dir(), config)?;
    Ok((ctx, ResultsStore::new(project.results_path())))
}

pub fn shell_runner(ctx: &AuditContext) -> ShellRunner {
    ShellRunner::new(
        &ctx.root,
        Duration::from_secs(ctx.config.command_timeout_secs),
    )
}
