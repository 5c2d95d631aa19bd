//! # Error Types
//!
//! Domain-specific error types for the scan engine. These give every fault
//! a name the runner can match on instead of propagating opaque `anyhow`
//! errors, while still converting cleanly from the underlying I/O, JSON and
//! HTTP error types.

use thiserror::Error;

/// Errors raised by the scan engine.
///
/// `BudgetExceeded` and `SchemaMalformed` are deliberately absent: the
/// former is loop control handled by breaking out of the dynamic scan, the
/// latter is tolerated by falling back to an empty parameter list. Neither
/// represents a fault that needs to propagate as a `Result::Err`.
#[derive(Error, Debug)]
pub enum ScanError {
    /// A transport call did not return before its deadline.
    #[error("transport timed out: {0}")]
    TransportTimeout(String),

    /// A transport-level I/O fault (connection refused, broken pipe, ...).
    #[error("transport I/O error: {0}")]
    TransportIo(#[from] std::io::Error),

    /// The transport returned bytes that do not decode as JSON.
    #[error("transport decode error: {0}")]
    TransportDecode(#[from] serde_json::Error),

    /// Configuration is missing or self-contradictory; fatal before scan start.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// An HTTP-transport-specific fault.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catch-all for faults that don't warrant their own variant.
    #[error("{0}")]
    Other(String),
}

/// Result type alias used throughout the scan engine.
pub type ScanResult<T> = Result<T, ScanError>;

impl ScanError {
    pub fn config(msg: impl Into<String>) -> Self {
        ScanError::ConfigInvalid(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        ScanError::TransportTimeout(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        ScanError::Other(msg.into())
    }
}

impl From<anyhow::Error> for ScanError {
    fn from(err: anyhow::Error) -> Self {
        ScanError::Other(err.to_string())
    }
}
