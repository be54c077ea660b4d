use std::fs;

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{ProjectArgs, ReportArgs};
use crate::report::generate_report;
use crate::store::ResultsStore;
use crate::util::{ensure_directory, now_utc_string};

pub fn run(project: &ProjectArgs, args: ReportArgs) -> Result<()> {
    let store = ResultsStore::new(project.results_path());
    let document = store.load();
    let report = generate_report(&document, args.filter, &now_utc_string());

    let Some(output) = args.output else {
        print!("{report}");
        return Ok(());
    };

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }
    fs::write(&output, &report)
        .with_context(|| format!("failed to write report {}", output.display()))?;

    info!(
        filter = %args.filter,
        path = %output.display(),
        last_run = %document.last_run.unwrap_or_default(),
        "report written"
    );
    Ok(())
}
