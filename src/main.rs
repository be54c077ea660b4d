mod audit;
mod checklist;
mod cli;
mod commands;
mod config;
mod model;
mod report;
mod server;
mod store;
mod util;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(err) => {
            error!(error = %err, "command failed");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Report(args)) => commands::report::run(&cli.project, args)?,
        None if cli.auto => return commands::auto::run(&cli.project),
        None => commands::serve::run(&cli.project, cli.port)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
