//! # Report
//!
//! The finding aggregator's output types, plus JSON and Markdown emission.
//! The JSON schema is stable: renaming or deleting a field here is a
//! breaking change for anything downstream that parses `report.json`.

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::{ScanError, ScanResult};
use crate::signals::SignalEvidence;

/// Severity is a total order: High > Medium > Low. Declared High-first so
/// the derived `Ord` matches that ordering directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Confidence is likewise a total order: High > Medium > Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
            Severity::Low => write!(f, "Low"),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "High"),
            Confidence::Medium => write!(f, "Medium"),
            Confidence::Low => write!(f, "Low"),
        }
    }
}

/// A single report-level record combining a probe outcome, its evidence,
/// and a severity assessment. Immutable once appended to a [`Report`].
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub confidence: Confidence,
    pub tool_name: String,
    pub probe_name: String,
    pub description: String,
    pub repro_args: serde_json::Value,
    pub evidence: Vec<SignalEvidence>,
    pub remediation: String,
}

/// Summary statistics assembled once at scan end.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub target: String,
    pub tool_count: usize,
    pub tests_run: u32,
    pub include_llm: bool,
}

/// The complete output of a scan.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub findings: Vec<Finding>,
}

impl Report {
    /// Writes `report.json` and `report.md` to `json_path`/`md_path`.
    pub fn write(&self, json_path: &Path, md_path: &Path) -> ScanResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(ScanError::TransportDecode)?;
        std::fs::write(json_path, json).map_err(io_err)?;
        std::fs::write(md_path, self.to_markdown()).map_err(io_err)?;
        Ok(())
    }

    fn to_markdown(&self) -> String {
        let mut lines = vec![
            "# MCP Red Team Report".to_string(),
            String::new(),
            "## Summary".to_string(),
            format!("- Target: {}", self.summary.target),
            format!("- Tools discovered: {}", self.summary.tool_count),
            format!("- Tests executed: {}", self.summary.tests_run),
            format!("- LLM probes enabled: {}", self.summary.include_llm),
            String::new(),
            "## Findings".to_string(),
        ];

        if self.findings.is_empty() {
            lines.push("No findings detected.".to_string());
            return lines.join("\n");
        }

        for finding in &self.findings {
            lines.push(format!(
                "### {}: {} on {}",
                finding.severity, finding.probe_name, finding.tool_name
            ));
            lines.push(format!("- Confidence: {}", finding.confidence));
            lines.push(format!("- Description: {}", finding.description));
            lines.push(format!("- Repro args: `{}`", finding.repro_args));
            lines.push(format!("- Remediation: {}", finding.remediation));
            lines.push("- Evidence:".to_string());
            for ev in &finding.evidence {
                lines.push(format!("  - {:?}: {} (transcript id {})", ev.signal, ev.detail, ev.transcript_id));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

fn io_err(e: io::Error) -> ScanError {
    ScanError::TransportIo(e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_total_order() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
    }

    #[test]
    fn confidence_total_order() {
        assert!(Confidence::High > Confidence::Medium);
        assert!(Confidence::Medium > Confidence::Low);
    }

    #[test]
    fn markdown_reports_no_findings() {
        let report = Report {
            summary: ReportSummary {
                target: "stdio:server".to_string(),
                tool_count: 0,
                tests_run: 0,
                include_llm: false,
            },
            findings: vec![],
        };
        assert!(report.to_markdown().contains("No findings detected."));
    }
}
