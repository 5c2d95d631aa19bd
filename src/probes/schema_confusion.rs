//! Calls every tool with an argument object that matches none of its
//! declared parameters, regardless of schema, to see how permissively the
//! server handles unexpected input.

use serde_json::json;

use crate::config::ScanMetadata;
use crate::mcp_client::Tool;
use crate::signals::SignalKind;

use super::base::{Probe, TestCase};

pub struct SchemaConfusionProbe;

impl Probe for SchemaConfusionProbe {
    fn name(&self) -> &'static str {
        "SchemaConfusionProbe"
    }

    fn generate(&self, tool: &Tool, _metadata: &ScanMetadata) -> Vec<TestCase> {
        vec![TestCase {
            tool_name: tool.name.clone(),
            args: json!({ "unexpected": [1, 2, 3] }),
            probe_name: self.name(),
            expected_signals: vec![SignalKind::ErrorLeakSignal],
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json as j;

    #[test]
    fn always_emits_one_case() {
        let tool = Tool {
            name: "anything".to_string(),
            description: String::new(),
            input_schema: j!({}),
        };
        let cases = SchemaConfusionProbe.generate(&tool, &ScanMetadata::default());
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].args, j!({"unexpected": [1, 2, 3]}));
    }
}
