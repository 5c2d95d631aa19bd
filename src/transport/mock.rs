//! In-process transport double used only by tests. Lets the runner's
//! end-to-end scenarios (canary leak, SSRF, error leak, timing, ...) be
//! exercised against a deterministic mock server instead of a real
//! subprocess or socket, since the lab servers are an out-of-scope
//! external collaborator.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

use crate::error::{ScanError, ScanResult};

use super::TransportResponse;

/// A scripted responder: given the outgoing JSON-RPC message, returns the
/// payload to hand back and a simulated processing delay.
pub type MockHandler = Arc<dyn Fn(&Value) -> (Value, Duration) + Send + Sync>;

pub struct MockTransport {
    handler: MockHandler,
}

impl MockTransport {
    pub fn new(handler: MockHandler) -> Self {
        Self { handler }
    }

    pub async fn send(&mut self, message: &Value, timeout: Duration) -> ScanResult<TransportResponse> {
        let (payload, delay) = (self.handler)(message);
        // `tokio::time::Instant` tracks the runtime's (possibly paused/
        // auto-advanced) clock, unlike `std::time::Instant`, which is tied
        // to the OS monotonic clock and barely moves under `start_paused`.
        let start = Instant::now();
        if tokio::time::timeout(timeout, tokio::time::sleep(delay)).await.is_err() {
            return Err(ScanError::timeout(format!(
                "mock transport exceeded {timeout:?}"
            )));
        }
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        Ok(TransportResponse { payload, latency_ms })
    }

    pub async fn close(&mut self) {}
}
