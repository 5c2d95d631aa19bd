//! Targets the first declared parameter of any tool with parameters,
//! handing it a deeply-nested oversized payload to check whether the tool
//! degrades gracefully or stalls.

use serde_json::json;

use crate::config::ScanMetadata;
use crate::heuristics::extract_param_names;
use crate::mcp_client::Tool;
use crate::signals::SignalKind;

use super::base::{Probe, TestCase};

pub struct DoSProbe;

impl Probe for DoSProbe {
    fn name(&self) -> &'static str {
        "DoSProbe"
    }

    fn generate(&self, tool: &Tool, _metadata: &ScanMetadata) -> Vec<TestCase> {
        let Some(param) = extract_param_names(tool).into_iter().next() else {
            return Vec::new();
        };
        let large_payload = "A".repeat(10_000);
        let nested: Vec<String> = std::iter::repeat(large_payload).take(20).collect();
        vec![TestCase {
            tool_name: tool.name.clone(),
            args: json!({ param: { "nested": nested } }),
            probe_name: self.name(),
            expected_signals: vec![SignalKind::TimingSignal],
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json as j;

    #[test]
    fn nests_twenty_ten_thousand_char_strings() {
        let tool = Tool {
            name: "summarize_log".to_string(),
            description: String::new(),
            input_schema: j!({"type": "object", "properties": {"input": {"type": "string"}}}),
        };
        let probe = DoSProbe;
        let cases = probe.generate(&tool, &ScanMetadata::default());
        let nested = cases[0].args["input"]["nested"].as_array().unwrap();
        assert_eq!(nested.len(), 20);
        assert_eq!(nested[0].as_str().unwrap().len(), 10_000);
    }

    #[test]
    fn skips_parameterless_tools() {
        let tool = Tool {
            name: "noop".to_string(),
            description: String::new(),
            input_schema: j!({}),
        };
        assert!(DoSProbe.generate(&tool, &ScanMetadata::default()).is_empty());
    }
}
