//! Targets any parameter whose name suggests a filesystem path, trying to
//! walk out of the intended directory to a planted canary file.

use serde_json::json;

use crate::config::ScanMetadata;
use crate::mcp_client::Tool;
use crate::signals::SignalKind;

use super::base::{params_matching, Probe, TestCase};

pub struct PathTraversalProbe;

impl Probe for PathTraversalProbe {
    fn name(&self) -> &'static str {
        "PathTraversalProbe"
    }

    fn generate(&self, tool: &Tool, _metadata: &ScanMetadata) -> Vec<TestCase> {
        let path_params = params_matching(tool, &["path", "file"]);
        let Some(param) = path_params.into_iter().next() else {
            return Vec::new();
        };
        vec![TestCase {
            tool_name: tool.name.clone(),
            args: json!({ param: "../secrets/canary.txt" }),
            probe_name: self.name(),
            expected_signals: vec![SignalKind::CanarySignal],
        }]
    }
}
