//! Structurally different from the other probes: a scanner, not a
//! generator. Runs once over the complete discovery results and flags any
//! tool, resource, or prompt description that looks like it's trying to
//! hijack the calling agent's instructions — no `callTool` involved.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::mcp_client::{Prompt, Resource, Tool};

static INJECTION_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)ignore (all|previous) instructions").unwrap(),
        Regex::new(r"(?i)system prompt").unwrap(),
        Regex::new(r"(?i)you are an? ai").unwrap(),
    ]
});

/// One description that matched an injection pattern, with a `kind:id`
/// location string (`tool:<name>`, `resource:<uri>`, `prompt:<name>`).
#[derive(Debug, Clone, PartialEq)]
pub struct PromptInjectionFinding {
    pub location: String,
    pub content: String,
}

pub struct PromptInjectionProbe;

impl PromptInjectionProbe {
    pub const NAME: &'static str = "PromptInjectionProbe";

    pub fn scan(
        &self,
        tools: &[Tool],
        resources: &[Resource],
        prompts: &[Prompt],
    ) -> Vec<PromptInjectionFinding> {
        let mut findings = Vec::new();
        for tool in tools {
            findings.extend(scan_text(format!("tool:{}", tool.name), &tool.description));
        }
        for resource in resources {
            findings.extend(scan_text(format!("resource:{}", resource.uri), &resource.description));
        }
        for prompt in prompts {
            findings.extend(scan_text(format!("prompt:{}", prompt.name), &prompt.description));
        }
        findings
    }
}

fn scan_text(location: String, text: &str) -> Vec<PromptInjectionFinding> {
    if INJECTION_PATTERNS.iter().any(|p| p.is_match(text)) {
        vec![PromptInjectionFinding {
            location,
            content: text.to_string(),
        }]
    } else {
        Vec::new()
    }
}
