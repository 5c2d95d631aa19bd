//! Targets any parameter whose name suggests a URL, pointing it at the
//! configured fake metadata endpoint to check for server-side request
//! forgery.

use serde_json::json;

use crate::config::ScanMetadata;
use crate::mcp_client::Tool;
use crate::signals::SignalKind;

use super::base::{params_matching, Probe, TestCase};

pub struct SSRFProbe;

impl Probe for SSRFProbe {
    fn name(&self) -> &'static str {
        "SSRFProbe"
    }

    fn generate(&self, tool: &Tool, metadata: &ScanMetadata) -> Vec<TestCase> {
        let url_params = params_matching(tool, &["url", "fetch"]);
        let Some(param) = url_params.into_iter().next() else {
            return Vec::new();
        };
        vec![TestCase {
            tool_name: tool.name.clone(),
            args: json!({ param: metadata.fake_metadata_url.clone() }),
            probe_name: self.name(),
            expected_signals: vec![SignalKind::SSRFSignal],
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json as j;

    fn tool_with_param(name: &str) -> Tool {
        Tool {
            name: "fetch_url".to_string(),
            description: String::new(),
            input_schema: j!({"type": "object", "properties": {name: {"type": "string"}}}),
        }
    }

    #[test]
    fn uses_configured_fake_metadata_url() {
        let probe = SSRFProbe;
        let mut metadata = ScanMetadata::default();
        metadata.fake_metadata_url = "http://127.0.0.1:9100/metadata".to_string();
        let cases = probe.generate(&tool_with_param("url"), &metadata);
        assert_eq!(cases[0].args["url"], "http://127.0.0.1:9100/metadata");
    }
}
