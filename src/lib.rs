//! # mcp-redteam
//!
//! An automated red-team scanner for Model-Context-Protocol (MCP) tool
//! servers. Given a stdio or HTTP MCP endpoint, this crate enumerates its
//! advertised tools, resources and prompts, statically judges their
//! descriptions for prompt-injection patterns, dynamically exercises each
//! tool with targeted adversarial inputs under a global budget, and emits
//! a redacted transcript plus a structured findings report.
//!
//! This crate is the scan engine only. Argument parsing, suite-file
//! loading, HTML/JUnit report rendering, the intentionally vulnerable lab
//! servers, and any LLM-judge hook are external collaborators that build
//! on top of [`run_scan`] — none of them live here.
//!
//! ## Example
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use mcp_redteam::config::ScanConfig;
//! use mcp_redteam::runner::run_scan;
//!
//! let config = ScanConfig::from_env()?;
//! let report = run_scan(&config).await?;
//! println!("{} findings", report.findings.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod heuristics;
pub mod mcp_client;
pub mod probes;
pub mod report;
pub mod runner;
pub mod signals;
pub mod transcript;
pub mod transport;
