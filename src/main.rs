//! # mcp-redteam
//!
//! Thin binary front-end over the [`mcp_redteam`] scan engine. Loads
//! configuration from the environment, runs one scan, and prints a
//! one-line summary. Argument parsing, suite files, and report rendering
//! beyond `report.json`/`report.md` are left to external collaborators —
//! see `mcp_redteam::runner::run_scan` for the library entry point this
//! binary wraps.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use mcp_redteam::config::ScanConfig;
use mcp_redteam::runner::run_scan;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let config = ScanConfig::from_env()?;
    eprintln!("[INFO] mcp-redteam scan starting...");

    let report = run_scan(&config).await?;

    eprintln!(
        "[INFO] scan complete: {} tools discovered, {} tests run, {} findings",
        report.summary.tool_count,
        report.summary.tests_run,
        report.findings.len()
    );

    Ok(())
}
