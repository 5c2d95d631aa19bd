//! Targets any parameter whose name suggests a shell command, appending a
//! benign-looking command chain that would leak `/etc/passwd` if executed
//! unsandboxed.

use serde_json::json;

use crate::config::ScanMetadata;
use crate::mcp_client::Tool;
use crate::signals::SignalKind;

use super::base::{params_matching, Probe, TestCase};

pub struct CmdInjectionProbe;

impl Probe for CmdInjectionProbe {
    fn name(&self) -> &'static str {
        "CmdInjectionProbe"
    }

    fn generate(&self, tool: &Tool, _metadata: &ScanMetadata) -> Vec<TestCase> {
        let cmd_params = params_matching(tool, &["cmd", "command"]);
        let Some(param) = cmd_params.into_iter().next() else {
            return Vec::new();
        };
        vec![TestCase {
            tool_name: tool.name.clone(),
            args: json!({ param: "echo safe && cat /etc/passwd" }),
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
    fn targets_command_param() {
        let tool = Tool {
            name: "run_cmd".to_string(),
            description: String::new(),
            input_schema: j!({"type": "object", "properties": {"command": {"type": "string"}}}),
        };
        let probe = CmdInjectionProbe;
        let cases = probe.generate(&tool, &ScanMetadata::default());
        assert_eq!(cases[0].args["command"], "echo safe && cat /etc/passwd");
    }
}
