//! # Transcript Writer
//!
//! An append-only, flushed-per-write log of every protocol exchange in a
//! scan. Entries are redacted before they ever touch disk: every string
//! value in a payload is walked depth-first and scrubbed of anything that
//! looks like a credential, so the transcript is safe to hand to whoever
//! reviews the scan later.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ScanError, ScanResult};

static SECRET_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)(api[_-]?key|token|secret|password)\s*[:=]\s*\S+").unwrap(),
        Regex::new(r"(?i)bearer\s+[A-Za-z0-9\-_=]+").unwrap(),
    ]
});

/// A single ordered entry in the transcript file.
#[derive(Debug, Serialize)]
pub struct TranscriptEntry {
    pub timestamp: String,
    pub direction: Direction,
    pub method: String,
    pub request_id: u64,
    pub payload: Value,
    pub latency_ms: Option<f64>,
    pub error: Option<String>,
}

/// Which side of an exchange an entry records.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Request,
    Response,
}

/// Redacts every string value in `value`, recursing through objects and
/// arrays. Idempotent: redacting an already-redacted value is a no-op,
/// since `<REDACTED>` itself never matches either secret pattern.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let mut redacted = s.clone();
            for pattern in SECRET_PATTERNS.iter() {
                redacted = pattern.replace_all(&redacted, "<REDACTED>").into_owned();
            }
            Value::String(redacted)
        }
        Value::Object(map) => {
            let redacted = map.iter().map(|(k, v)| (k.clone(), redact(v))).collect();
            Value::Object(redacted)
        }
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// Appends redacted, ordered exchange records to `<out>/transcript.jsonl`.
pub struct TranscriptWriter {
    handle: File,
}

impl TranscriptWriter {
    /// Opens (creating/truncating) the transcript file at `path`.
    pub fn create(path: &Path) -> ScanResult<Self> {
        let handle = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(ScanError::TransportIo)?;
        Ok(Self { handle })
    }

    /// Records one exchange event. The payload is redacted before
    /// serialization; the entry is flushed immediately so the file survives
    /// an ungraceful exit.
    pub fn record(
        &mut self,
        direction: Direction,
        method: &str,
        request_id: u64,
        payload: &Value,
        latency_ms: Option<f64>,
        error: Option<String>,
    ) -> ScanResult<()> {
        let entry = TranscriptEntry {
            timestamp: now_iso8601(),
            direction,
            method: method.to_string(),
            request_id,
            payload: redact(payload),
            latency_ms,
            error,
        };
        let mut line = serde_json::to_vec(&entry).map_err(ScanError::TransportDecode)?;
        line.push(b'\n');
        self.handle.write_all(&line).map_err(ScanError::TransportIo)?;
        self.handle.flush().map_err(ScanError::TransportIo)?;
        Ok(())
    }

    /// Flushes and closes the underlying file handle. Safe to call more
    /// than once.
    pub fn close(&mut self) {
        let _ = self.handle.flush();
    }
}

fn now_iso8601() -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = now.as_secs();
    humantime_iso8601(secs)
}

/// Formats a unix timestamp as second-precision ISO-8601 UTC
/// (`YYYY-MM-DDTHH:MM:SSZ`) without pulling in a date/time crate the rest
/// of this crate's ancestry doesn't already depend on.
fn humantime_iso8601(secs: u64) -> String {
    const DAYS_IN_MONTH: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let days_total = (secs / 86400) as i64;
    let time_of_day = secs % 86400;
    let hour = time_of_day / 3600;
    let minute = (time_of_day % 3600) / 60;
    let second = time_of_day % 60;

    let mut year = 1970i64;
    let mut remaining_days = days_total;
    loop {
        let leap = is_leap_year(year);
        let days_in_year = if leap { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let mut month = 0usize;
    for (i, &len) in DAYS_IN_MONTH.iter().enumerate() {
        let len = if i == 1 && is_leap_year(year) { len + 1 } else { len };
        if remaining_days < len {
            month = i;
            break;
        }
        remaining_days -= len;
    }
    let day = remaining_days + 1;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month + 1,
        day,
        hour,
        minute,
        second
    )
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn redacts_api_key_pattern() {
        let input = json!({"msg": "api_key: abc123XYZ"});
        let out = redact(&input);
        assert_eq!(out["msg"], "api_key: <REDACTED>");
    }

    #[test]
    fn redacts_bearer_token() {
        let input = json!("Authorization: Bearer abcDEF123-_=");
        let out = redact(&input);
        assert_eq!(out, json!("Authorization: <REDACTED>"));
    }

    #[test]
    fn redaction_is_idempotent() {
        let input = json!({"nested": {"password": "p@ss=hunter2", "list": ["token: zzz", "fine"]}});
        let once = redact(&input);
        let twice = redact(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn non_matching_strings_pass_through() {
        let input = json!({"ok": "nothing sensitive here"});
        assert_eq!(redact(&input), input);
    }

    #[test]
    fn epoch_formats_as_1970() {
        assert_eq!(humantime_iso8601(0), "1970-01-01T00:00:00Z");
    }
}
