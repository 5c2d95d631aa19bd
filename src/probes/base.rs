//! Shared types and helpers for probe generators.

use serde_json::Value;

use crate::config::ScanMetadata;
use crate::heuristics::extract_param_names;
use crate::mcp_client::Tool;
use crate::signals::SignalKind;

/// One adversarial input generated by a probe, ready to dispatch via
/// `callTool`.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub tool_name: String,
    pub args: Value,
    pub probe_name: &'static str,
    pub expected_signals: Vec<SignalKind>,
}

/// Returns the top-level parameter names of `tool`'s input schema whose
/// lowercased form contains any of `needles`.
pub fn params_matching(tool: &Tool, needles: &[&str]) -> Vec<String> {
    extract_param_names(tool)
        .into_iter()
        .filter(|p| {
            let lower = p.to_lowercase();
            needles.iter().any(|needle| lower.contains(needle))
        })
        .collect()
}

/// The uniform capability every probe satisfies: a stable name and a pure,
/// deterministic generator from a tool (plus scanner metadata) to zero or
/// more test cases.
pub trait Probe {
    fn name(&self) -> &'static str;
    fn generate(&self, tool: &Tool, metadata: &ScanMetadata) -> Vec<TestCase>;
}
