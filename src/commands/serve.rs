use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::ProjectArgs;
use crate::server::{self, AppState};

use super::{open_project, shell_runner};

pub fn run(project: &ProjectArgs, port: u16) -> Result<()> {
    let (ctx, store) = open_project(project)?;
    let runner = shell_runner(&ctx);
    let state = Arc::new(AppState::new(ctx, store, Box::new(runner)));
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(server::serve(addr, state))
}
