//! Error types for screenpilot
//!
//! Centralized error handling using thiserror.
//!
//! Execution faults (timeouts, non-zero exits, spawn failures) are NOT
//! errors here: the Execution Gateway folds them into `ExecutionResult`
//! with `success=false`. Likewise `insufficient_info` is a flag on
//! `Instruction`, not an error.

use thiserror::Error;

/// All error types that can occur in screenpilot
#[derive(Debug, Error)]
pub enum PilotError {
    /// Observer did not return within its bounded timeout
    #[error("Observation timed out after {secs} seconds")]
    ObservationTimeout { secs: u64 },

    /// Observer returned but the snapshot could not be produced
    #[error("Observation failed: {0}")]
    ObservationFailure(String),

    /// Planner fault: endpoint unreachable, malformed reply, or an
    /// instruction that violates the single-step contract
    #[error("Planning failed: {0}")]
    Planning(String),

    /// Confirmation channel fault (not a rejection - rejections are data)
    #[error("Confirmation failed: {0}")]
    Confirmation(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Skill descriptor error
    #[error("Skill error: {0}")]
    Skill(String),

    /// HTTP gateway error
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for screenpilot operations
pub type Result<T> = std::result::Result<T, PilotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_timeout_error() {
        let err = PilotError::ObservationTimeout { secs: 30 };
        assert_eq!(err.to_string(), "Observation timed out after 30 seconds");
    }

    #[test]
    fn test_observation_failure_error() {
        let err = PilotError::ObservationFailure("device offline".to_string());
        assert_eq!(err.to_string(), "Observation failed: device offline");
    }

    #[test]
    fn test_planning_error() {
        let err = PilotError::Planning("model returned two steps".to_string());
        assert_eq!(err.to_string(), "Planning failed: model returned two steps");
    }

    #[test]
    fn test_config_error() {
        let err = PilotError::Config("max_rounds must be > 0".to_string());
        assert_eq!(err.to_string(), "Config error: max_rounds must be > 0");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PilotError = io_err.into();
        assert!(matches!(err, PilotError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: PilotError = json_err.into();
        assert!(matches!(err, PilotError::Json(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(PilotError::Planning("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
