//! # MCP Client
//!
//! Thin wrapper over [`Transport`] that assigns monotonically increasing
//! request ids, builds the JSON-RPC envelope, and exposes the handful of
//! MCP methods the scan engine needs. Parsing of server responses is
//! defensive throughout: unknown keys are ignored, and a missing or
//! wrongly-typed field yields the typed default rather than aborting the
//! scan — the same tolerance this crate's ancestry applies when an MCP peer
//! sends a shape it doesn't expect.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ScanResult;
use crate::transport::Transport;

/// Protocol version string sent during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// A named, schema-typed callable exposed by an MCP server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "empty_object", rename = "inputSchema")]
    pub input_schema: Value,
}

/// A named resource an MCP server exposes for reading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub description: String,
}

/// A named prompt template an MCP server exposes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prompt {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

fn empty_object() -> Value {
    json!({})
}

/// The decoded result of a single MCP request/response round trip.
///
/// `result` and `error` are mutually exclusive by construction: exactly one
/// is populated, taken straight from whichever key the transport's decoded
/// payload carried.
#[derive(Debug, Clone)]
pub struct MCPResponse {
    pub request_id: u64,
    pub result: Option<Value>,
    pub error: Option<Value>,
    pub latency_ms: f64,
}

/// Owns a [`Transport`] and speaks the subset of MCP needed to scan a
/// server: handshake, discovery, and tool invocation.
pub struct MCPClient {
    transport: Transport,
    next_id: AtomicU64,
}

impl MCPClient {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    async fn send_request(&mut self, method: &str, params: Value, timeout: Duration) -> ScanResult<MCPResponse> {
        let request_id = self.allocate_id();
        let message = json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": method,
            "params": params,
        });

        let response = self.transport.send(&message, timeout).await?;
        let payload = response.payload;

        Ok(MCPResponse {
            request_id,
            result: payload.get("result").cloned(),
            error: payload.get("error").cloned(),
            latency_ms: response.latency_ms,
        })
    }

    /// Performs the MCP handshake.
    pub async fn initialize(&mut self, timeout: Duration) -> ScanResult<MCPResponse> {
        self.send_request(
            "initialize",
            json!({"protocolVersion": PROTOCOL_VERSION, "capabilities": {}}),
            timeout,
        )
        .await
    }

    /// Lists the tools a server advertises, tolerating missing fields.
    pub async fn list_tools(&mut self, timeout: Duration) -> ScanResult<(MCPResponse, Vec<Tool>)> {
        let response = self.send_request("listTools", json!({}), timeout).await?;
        let tools = response
            .result
            .as_ref()
            .and_then(|r| r.get("tools"))
            .and_then(|t| t.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| parse_tool(item))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok((response, tools))
    }

    /// Lists the resources a server advertises.
    pub async fn list_resources(&mut self, timeout: Duration) -> ScanResult<(MCPResponse, Vec<Resource>)> {
        let response = self.send_request("listResources", json!({}), timeout).await?;
        let resources = response
            .result
            .as_ref()
            .and_then(|r| r.get("resources"))
            .and_then(|t| t.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| Resource {
                        uri: item.get("uri").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                        description: item
                            .get("description")
                            .and_then(|v| v.as_str())
                            .unwrap_or("")
                            .to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok((response, resources))
    }

    /// Lists the prompts a server advertises.
    pub async fn list_prompts(&mut self, timeout: Duration) -> ScanResult<(MCPResponse, Vec<Prompt>)> {
        let response = self.send_request("listPrompts", json!({}), timeout).await?;
        let prompts = response
            .result
            .as_ref()
            .and_then(|r| r.get("prompts"))
            .and_then(|t| t.as_array())
            .map(|items| {
                items
                    .iter()
                    .map(|item| Prompt {
                        name: item.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                        description: item
                            .get("description")
                            .and_then(|v| v.as_str())
                            .unwrap_or("")
                            .to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok((response, prompts))
    }

    /// Invokes a tool by name with the given arguments.
    pub async fn call_tool(&mut self, name: &str, args: &Value, timeout: Duration) -> ScanResult<MCPResponse> {
        self.send_request("callTool", json!({"name": name, "arguments": args}), timeout)
            .await
    }

    /// Releases the underlying transport.
    pub async fn close(&mut self) {
        self.transport.close().await;
    }
}

fn parse_tool(item: &Value) -> Tool {
    Tool {
        name: item.get("name").and_then(|v| v.as_str()).unwrap_or("").to_string(),
        description: item
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string(),
        input_schema: item.get("inputSchema").cloned().unwrap_or_else(empty_object),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tool_defaults_missing_fields() {
        let tool = parse_tool(&json!({"name": "read_file"}));
        assert_eq!(tool.name, "read_file");
        assert_eq!(tool.description, "");
        assert_eq!(tool.input_schema, json!({}));
    }

    #[test]
    fn parse_tool_keeps_schema() {
        let tool = parse_tool(&json!({
            "name": "fetch_url",
            "description": "fetches a url",
            "inputSchema": {"type": "object", "properties": {"url": {"type": "string"}}}
        }));
        assert_eq!(tool.input_schema["properties"]["url"]["type"], "string");
    }
}
