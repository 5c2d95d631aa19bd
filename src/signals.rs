//! # Signal Detectors
//!
//! Pure functions that inspect a stringified response payload (and, for
//! timing, a measured latency) for evidence that a probe succeeded. Each
//! detector takes the transcript id of the triggering exchange so a report
//! can point straight back to it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// A single piece of evidence a detector found in a response.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SignalEvidence {
    pub signal: SignalKind,
    pub detail: String,
    pub transcript_id: u64,
}

/// The kinds of signal a detector can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum SignalKind {
    ErrorLeakSignal,
    CanarySignal,
    SSRFSignal,
    TimingSignal,
    /// Not produced by a dynamic detector — attached to a static
    /// `PromptInjectionProbe` finding, whose description match is a
    /// different kind of evidence than a `callTool` response signal.
    PromptInjectionSignal,
}

static ERROR_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)Traceback").unwrap(),
        Regex::new(r"(?i)Exception").unwrap(),
        Regex::new(r#"(?i)File "[^"]+""#).unwrap(),
    ]
});

/// Flags a response that looks like it leaked a stack trace or exception.
pub fn detect_error_leak(response_payload: &Value, transcript_id: u64) -> Vec<SignalEvidence> {
    let text = response_payload.to_string();
    if ERROR_PATTERNS.iter().any(|p| p.is_match(&text)) {
        vec![SignalEvidence {
            signal: SignalKind::ErrorLeakSignal,
            detail: "Potential stack trace or exception leakage".to_string(),
            transcript_id,
        }]
    } else {
        Vec::new()
    }
}

/// Flags a response that echoed back the path-traversal canary.
pub fn detect_canary(response_payload: &Value, transcript_id: u64) -> Vec<SignalEvidence> {
    let text = response_payload.to_string();
    if text.contains("CANARY_SECRET") {
        vec![SignalEvidence {
            signal: SignalKind::CanarySignal,
            detail: "Canary value detected in response".to_string(),
            transcript_id,
        }]
    } else {
        Vec::new()
    }
}

/// Flags a response that echoed back the fake metadata token, i.e. the
/// tool followed an attacker-controlled URL.
pub fn detect_ssrf(response_payload: &Value, transcript_id: u64) -> Vec<SignalEvidence> {
    let text = response_payload.to_string();
    if text.contains("FAKE_METADATA_TOKEN") {
        vec![SignalEvidence {
            signal: SignalKind::SSRFSignal,
            detail: "Fake metadata token detected".to_string(),
            transcript_id,
        }]
    } else {
        Vec::new()
    }
}

/// Flags a response whose measured latency met or exceeded `threshold_ms`.
/// Threshold policy (owned by the caller): `0.8 * configured_timeout_ms`.
pub fn detect_timing(latency_ms: f64, threshold_ms: f64, transcript_id: u64) -> Vec<SignalEvidence> {
    if latency_ms >= threshold_ms {
        vec![SignalEvidence {
            signal: SignalKind::TimingSignal,
            detail: format!("Latency {latency_ms:.1}ms exceeds threshold {threshold_ms:.1}ms"),
            transcript_id,
        }]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_leak_matches_traceback() {
        let payload = json!({"error": {"message": "Traceback (most recent call last): Exception: foo"}});
        let evidence = detect_error_leak(&payload, 1);
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].signal, SignalKind::ErrorLeakSignal);
    }

    #[test]
    fn error_leak_ignores_clean_payload() {
        let payload = json!({"result": {"content": "all good"}});
        assert!(detect_error_leak(&payload, 1).is_empty());
    }

    #[test]
    fn canary_detects_literal_marker() {
        let payload = json!({"result": {"content": "CANARY_SECRET=local-canary"}});
        assert_eq!(detect_canary(&payload, 7).len(), 1);
    }

    #[test]
    fn ssrf_detects_literal_marker() {
        let payload = json!({"result": {"body": "FAKE_METADATA_TOKEN=local-metadata"}});
        assert_eq!(detect_ssrf(&payload, 3).len(), 1);
    }

    #[test]
    fn timing_respects_threshold() {
        assert!(detect_timing(9000.0, 8000.0, 1).len() == 1);
        assert!(detect_timing(100.0, 8000.0, 1).is_empty());
    }

    #[test]
    fn detectors_are_pure() {
        let payload = json!({"result": {"content": "CANARY_SECRET"}});
        let first = detect_canary(&payload, 1);
        let second = detect_canary(&payload, 1);
        assert_eq!(first, second);
    }
}
