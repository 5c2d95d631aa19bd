//! HTTP JSON-RPC transport variant.
//!
//! Serializes the message as JSON, POSTs it to the configured URL with
//! `Content-Type: application/json`, and measures wall-clock latency
//! between send start and body-read completion. Built on `reqwest::Client`
//! the same way this crate's MCP client talks to its HTTP API: a bare
//! `Client::new()` held alongside the endpoint, no connection pooling
//! tuning beyond what `reqwest` already does by default.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;

use crate::error::{ScanError, ScanResult};

use super::TransportResponse;

pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub async fn send(&mut self, message: &Value, timeout: Duration) -> ScanResult<TransportResponse> {
        let start = Instant::now();
        let request = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(message)
            .timeout(timeout);

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ScanError::timeout(format!("HTTP request to {} exceeded {:?}", self.url, timeout))
            } else {
                ScanError::Http(e)
            }
        })?;

        let bytes = response.bytes().await.map_err(ScanError::Http)?;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let payload: Value = serde_json::from_slice(&bytes).map_err(ScanError::TransportDecode)?;

        Ok(TransportResponse { payload, latency_ms })
    }

    pub async fn close(&mut self) {
        // reqwest::Client has no explicit teardown; dropping it releases
        // pooled connections.
    }
}
