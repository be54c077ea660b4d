use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::model::ReportFilter;
use crate::store::DEFAULT_RESULTS_FILE;

#[derive(Parser, Debug)]
#[command(
    name = "launch-audit",
    version,
    about = "Pre-launch checklist audit and dashboard for a static site build"
)]
pub struct Cli {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Run the automated sections once, print failures and exit non-zero on any.
    #[arg(long, default_value_t = false)]
    pub auto: bool,

    #[arg(long, default_value_t = 3200)]
    pub port: u16,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write the Markdown report for the stored results.
    Report(ReportArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Build output directory; defaults to `<root>/dist`.
    #[arg(long, global = true)]
    pub dist_dir: Option<PathBuf>,

    /// Results file; defaults to `<root>/checklist-results.json`.
    #[arg(long, global = true)]
    pub results_path: Option<PathBuf>,

    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl ProjectArgs {
    pub fn dist_dir(&self) -> PathBuf {
        self.dist_dir
            .clone()
            .unwrap_or_else(|| self.root.join("dist"))
    }

    pub fn results_path(&self) -> PathBuf {
        self.results_path
            .clone()
            .unwrap_or_else(|| self.root.join(DEFAULT_RESULTS_FILE))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[arg(long, value_enum, default_value_t = ReportFilter::All)]
    pub filter: ReportFilter,

    /// Destination file; the report goes to stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
