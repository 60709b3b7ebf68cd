//! ExecutionResult: the bounded report from one Execution Gateway call.
//!
//! Field shape matches the wire contract of `POST /run`:
//! `{success, stdout_tail?, stderr_tail?, duration}`.

use serde::{Deserialize, Serialize};

/// Maximum characters kept from the end of each output stream.
pub const TAIL_LIMIT: usize = 2000;

/// Result of one external agent invocation. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// True iff the agent completed with a zero exit status
    pub success: bool,

    /// Last 2000 chars of stdout, absent when the stream was empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_tail: Option<String>,

    /// Last 2000 chars of stderr, absent when the stream was empty
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_tail: Option<String>,

    /// Wall-clock seconds from call entry to completion
    pub duration: f64,
}

impl ExecutionResult {
    /// Build a result from raw streams, truncating to the tail limit.
    pub fn completed(success: bool, stdout: &str, stderr: &str, duration: f64) -> Self {
        Self {
            success,
            stdout_tail: tail(stdout),
            stderr_tail: tail(stderr),
            duration,
        }
    }

    /// Build the timeout result with the canonical diagnostic text.
    pub fn timed_out(timeout_secs: u64, duration: f64) -> Self {
        Self {
            success: false,
            stdout_tail: None,
            stderr_tail: Some(format!("Command timed out after {} seconds", timeout_secs)),
            duration,
        }
    }

    /// Build a failure result from an execution fault.
    pub fn faulted(error: impl std::fmt::Display, duration: f64) -> Self {
        Self {
            success: false,
            stdout_tail: None,
            stderr_tail: Some(error.to_string()),
            duration,
        }
    }
}

/// Last `TAIL_LIMIT` chars of a stream, or None when it was empty.
///
/// Truncation counts chars, not bytes, so multi-byte text never splits.
pub fn tail(stream: &str) -> Option<String> {
    if stream.is_empty() {
        return None;
    }
    let count = stream.chars().count();
    if count <= TAIL_LIMIT {
        Some(stream.to_string())
    } else {
        Some(stream.chars().skip(count - TAIL_LIMIT).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_empty_stream_is_absent() {
        assert_eq!(tail(""), None);
    }

    #[test]
    fn test_tail_short_stream_unchanged() {
        assert_eq!(tail("hello"), Some("hello".to_string()));
    }

    #[test]
    fn test_tail_truncates_to_limit() {
        let long = "x".repeat(TAIL_LIMIT + 500);
        let t = tail(&long).unwrap();
        assert_eq!(t.chars().count(), TAIL_LIMIT);
    }

    #[test]
    fn test_tail_keeps_end_of_stream() {
        let long = format!("{}FINAL", "x".repeat(TAIL_LIMIT));
        let t = tail(&long).unwrap();
        assert!(t.ends_with("FINAL"));
    }

    #[test]
    fn test_tail_multibyte_safe() {
        let long = "日".repeat(TAIL_LIMIT + 10);
        let t = tail(&long).unwrap();
        assert_eq!(t.chars().count(), TAIL_LIMIT);
    }

    #[test]
    fn test_completed_result_empty_streams() {
        let result = ExecutionResult::completed(true, "", "", 1.5);
        assert!(result.success);
        assert!(result.stdout_tail.is_none());
        assert!(result.stderr_tail.is_none());
        assert_eq!(result.duration, 1.5);
    }

    #[test]
    fn test_timed_out_result_canonical_message() {
        let result = ExecutionResult::timed_out(300, 300.1);
        assert!(!result.success);
        assert_eq!(
            result.stderr_tail.as_deref(),
            Some("Command timed out after 300 seconds")
        );
        assert!(result.stdout_tail.is_none());
    }

    #[test]
    fn test_faulted_result() {
        let result = ExecutionResult::faulted("No such file or directory", 0.01);
        assert!(!result.success);
        assert_eq!(
            result.stderr_tail.as_deref(),
            Some("No such file or directory")
        );
    }

    #[test]
    fn test_serialization_omits_absent_tails() {
        let result = ExecutionResult::completed(true, "", "", 2.0);
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("stdout_tail"));
        assert!(!json.contains("stderr_tail"));
        assert!(json.contains("\"success\":true"));
    }

    #[test]
    fn test_deserializes_wire_shape() {
        let json = r#"{"success": false, "stderr_tail": "boom", "duration": 0.5}"#;
        let result: ExecutionResult = serde_json::from_str(json).unwrap();
        assert!(!result.success);
        assert_eq!(result.stderr_tail.as_deref(), Some("boom"));
        assert!(result.stdout_tail.is_none());
    }
}
