//! Binary entry point for the wmcp-folder MCP server.

use anyhow::Context;
use clap::Parser;
use rmcp::ServiceExt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use wmcp_folder::{FolderServer, TracingMonitor};

/// Walrus MCP Folder Server — exposes the text files of one folder, read-only.
#[derive(Parser)]
#[command(name = "wmcp-folder", version, about)]
struct Cli {
    /// Folder whose top-level text files are exposed.
    folder: PathBuf,

    /// Log every tool call and its outcome to stderr.
    #[arg(long, visible_alias = "monitor")]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    // stdout carries the protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let catalog = wmcp_folder::load_folder(&cli.folder)
        .with_context(|| format!("failed to prepare folder {}", cli.folder.display()))?;
    let root = catalog.root().display().to_string();

    let mut server = FolderServer::new(catalog);
    if cli.debug {
        server = server.with_monitor(Arc::new(TracingMonitor));
    }

    tracing::info!("wmcp-folder serving {root} (debug={})", cli.debug);
    let transport = rmcp::transport::stdio();
    server
        .serve(transport)
        .await
        .context("failed to start server")?
        .waiting()
        .await
        .context("server error")?;
    Ok(())
}
