//! # Configuration Management
//!
//! Loads and validates the settings a scan needs: which transport to use,
//! the call budget, the per-call timeout, where to write output, whether
//! LLM-judge probes are enabled, and the scanner metadata dictionary
//! consumed by the SSRF and Auth probes. Values are loaded from environment
//! variables with `.env` support for local development, following the same
//! pattern the rest of this crate's ancestry uses for its own configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};

/// Which transport a scan should use to reach the target MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportKind {
    /// Spawn a subprocess and speak JSON-RPC over its stdin/stdout.
    Stdio { command: String },
    /// POST JSON-RPC envelopes to an HTTP endpoint.
    Http { url: String },
}

/// Scanner metadata consumed by probes that need a lab-specific value
/// (the fake SSRF target, whether the lab supports toggling auth).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub fake_metadata_url: String,
    pub lab_supports_auth_toggle: bool,
}

impl Default for ScanMetadata {
    fn default() -> Self {
        Self {
            fake_metadata_url: "http://127.0.0.1:9100/metadata".to_string(),
            lab_supports_auth_toggle: false,
        }
    }
}

/// Full configuration for a single scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub transport: TransportKind,
    /// Hard ceiling on `callTool` invocations for the whole scan.
    pub budget: u32,
    /// Per-call deadline applied to every transport send.
    pub timeout: Duration,
    pub out_dir: PathBuf,
    pub include_llm_probes: bool,
    pub metadata: ScanMetadata,
}

impl ScanConfig {
    /// Loads configuration from environment variables.
    ///
    /// Attempts to load a `.env` file from the current directory first,
    /// matching the loading order the rest of this crate's configuration
    /// surface uses. Fails fast with `ScanError::ConfigInvalid` if the
    /// selected transport is missing its required argument, or if the
    /// budget/timeout are not positive.
    ///
    /// # Environment Variables
    ///
    /// - `MCP_REDTEAM_TRANSPORT` (required): `stdio` or `http`
    /// - `MCP_REDTEAM_CMD`: command line for the stdio transport
    /// - `MCP_REDTEAM_URL`: endpoint URL for the http transport
    /// - `MCP_REDTEAM_BUDGET` (optional, default 50)
    /// - `MCP_REDTEAM_TIMEOUT_SECS` (optional, default 10.0)
    /// - `MCP_REDTEAM_OUT` (optional, default `./runs`)
    /// - `MCP_REDTEAM_INCLUDE_LLM` (optional, default false)
    /// - `MCP_REDTEAM_FAKE_METADATA_URL` (optional)
    /// - `MCP_REDTEAM_LAB_AUTH_TOGGLE` (optional, default false)
    pub fn from_env() -> ScanResult<Self> {
        dotenv::dotenv().ok();

        let transport_kind = std::env::var("MCP_REDTEAM_TRANSPORT")
            .map_err(|_| ScanError::config("MCP_REDTEAM_TRANSPORT not set"))?;

        let transport = match transport_kind.as_str() {
            "stdio" => {
                let command = std::env::var("MCP_REDTEAM_CMD")
                    .map_err(|_| ScanError::config("MCP_REDTEAM_CMD is required for stdio transport"))?;
                TransportKind::Stdio { command }
            }
            "http" => {
                let url = std::env::var("MCP_REDTEAM_URL")
                    .map_err(|_| ScanError::config("MCP_REDTEAM_URL is required for http transport"))?;
                TransportKind::Http { url }
            }
            other => {
                return Err(ScanError::config(format!(
                    "unsupported transport '{other}', expected 'stdio' or 'http'"
                )));
            }
        };

        let budget: u32 = std::env::var("MCP_REDTEAM_BUDGET")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .map_err(|_| ScanError::config("MCP_REDTEAM_BUDGET must be a positive integer"))?
            .unwrap_or(50);
        if budget == 0 {
            return Err(ScanError::config("MCP_REDTEAM_BUDGET must be positive"));
        }

        let timeout_secs: f64 = std::env::var("MCP_REDTEAM_TIMEOUT_SECS")
            .ok()
            .map(|v| v.parse())
            .transpose()
            .map_err(|_| ScanError::config("MCP_REDTEAM_TIMEOUT_SECS must be a positive number"))?
            .unwrap_or(10.0);
        if !(timeout_secs > 0.0) {
            return Err(ScanError::config("MCP_REDTEAM_TIMEOUT_SECS must be positive"));
        }

        let out_dir = std::env::var("MCP_REDTEAM_OUT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("runs"));

        let include_llm_probes = std::env::var("MCP_REDTEAM_INCLUDE_LLM")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let mut metadata = ScanMetadata::default();
        if let Ok(url) = std::env::var("MCP_REDTEAM_FAKE_METADATA_URL") {
            metadata.fake_metadata_url = url;
        }
        if let Ok(toggle) = std::env::var("MCP_REDTEAM_LAB_AUTH_TOGGLE") {
            metadata.lab_supports_auth_toggle =
                matches!(toggle.to_lowercase().as_str(), "1" | "true" | "yes");
        }

        Ok(ScanConfig {
            transport,
            budget,
            timeout: Duration::from_secs_f64(timeout_secs),
            out_dir,
            include_llm_probes,
            metadata,
        })
    }
}
