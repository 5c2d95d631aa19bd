//! # Transport
//!
//! The capability that unifies stdio-subprocess and HTTP JSON-RPC MCP
//! servers behind a single request/response contract with bounded latency.
//! Two variants, one operation — a sum type rather than a trait-object
//! hierarchy, since there is exactly one shape to dispatch on: send a
//! JSON-RPC-shaped message, get back the decoded response and the observed
//! round-trip latency.

pub mod http;
pub mod stdio;
#[cfg(test)]
pub mod mock;

use std::time::Duration;

use serde_json::Value;

use crate::error::ScanResult;
use http::HttpTransport;
use stdio::StdioTransport;

/// The decoded payload returned by a transport call, plus how long it took.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub payload: Value,
    pub latency_ms: f64,
}

/// A live connection to an MCP server, over stdio or HTTP.
///
/// Both variants own OS resources (a child process handle, or connection
/// state) and release them deterministically via `close`. The `Mock`
/// variant exists only for tests, so end-to-end scan scenarios can be
/// exercised without a real subprocess or socket.
pub enum Transport {
    Stdio(StdioTransport),
    Http(HttpTransport),
    #[cfg(test)]
    Mock(mock::MockTransport),
}

impl Transport {
    /// Sends a single JSON-RPC-shaped message and waits for the matching
    /// response, failing with `ScanError::TransportTimeout` if `timeout`
    /// elapses first.
    pub async fn send(&mut self, message: &Value, timeout: Duration) -> ScanResult<TransportResponse> {
        match self {
            Transport::Stdio(t) => t.send(message, timeout).await,
            Transport::Http(t) => t.send(message, timeout).await,
            #[cfg(test)]
            Transport::Mock(t) => t.send(message, timeout).await,
        }
    }

    /// Releases the transport's underlying resources. Idempotent.
    pub async fn close(&mut self) {
        match self {
            Transport::Stdio(t) => t.close().await,
            Transport::Http(t) => t.close().await,
            #[cfg(test)]
            Transport::Mock(t) => t.close().await,
        }
    }
}
