//! Lab-only probe: when the metadata dictionary says the target supports
//! toggling authorization and the tool is the lab's `read_file`, tries to
//! read a path that should require elevated access.

use serde_json::json;

use crate::config::ScanMetadata;
use crate::mcp_client::Tool;
use crate::signals::SignalKind;

use super::base::{Probe, TestCase};

pub struct AuthProbe;

impl Probe for AuthProbe {
    fn name(&self) -> &'static str {
        "AuthProbe"
    }

    fn generate(&self, tool: &Tool, metadata: &ScanMetadata) -> Vec<TestCase> {
        if !metadata.lab_supports_auth_toggle || tool.name != "read_file" {
            return Vec::new();
        }
        vec![TestCase {
            tool_name: tool.name.clone(),
            args: json!({ "path": "protected/secret.txt" }),
            probe_name: self.name(),
            expected_signals: vec![SignalKind::ErrorLeakSignal],
        }]
    }
}
