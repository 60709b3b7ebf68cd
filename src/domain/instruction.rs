//! Instruction: one short directive proposed by the Planner.

use serde::{Deserialize, Serialize};

use crate::error::{PilotError, Result};

/// Target instruction length the Planner is asked to stay within.
pub const INSTRUCTION_TARGET_LEN: usize = 30;

/// Hard cap beyond which an instruction is rejected as a planning fault.
pub const INSTRUCTION_HARD_CAP: usize = 120;

/// A single short directive plus its classification flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    /// The directive text, e.g. "tap the Settings icon"
    pub text: String,

    /// True when the instruction falls into a configured sensitive
    /// category and must be confirmed by a human before execution
    #[serde(default)]
    pub sensitive: bool,

    /// True when the snapshot lacked enough signal to choose a next step;
    /// the coordinator re-observes instead of executing
    #[serde(default)]
    pub insufficient_info: bool,
}

impl Instruction {
    /// Create an actionable instruction after validating the single-step
    /// contract: non-empty, one line, bounded length.
    pub fn actionable(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        validate_instruction_text(&text)?;
        Ok(Self {
            text,
            sensitive: false,
            insufficient_info: false,
        })
    }

    /// Create the "need another look at the screen" response.
    pub fn insufficient_info() -> Self {
        Self {
            text: String::new(),
            sensitive: false,
            insufficient_info: true,
        }
    }

    /// Mark the instruction sensitive.
    pub fn mark_sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

/// Validate that a directive is exactly one short step.
pub fn validate_instruction_text(text: &str) -> Result<()> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PilotError::Planning(
            "instruction must not be empty".to_string(),
        ));
    }
    if trimmed.lines().count() > 1 {
        return Err(PilotError::Planning(
            "instruction must be a single step, got multiple lines".to_string(),
        ));
    }
    let len = trimmed.chars().count();
    if len > INSTRUCTION_HARD_CAP {
        return Err(PilotError::Planning(format!(
            "instruction too long: {} chars (cap {})",
            len, INSTRUCTION_HARD_CAP
        )));
    }
    if len > INSTRUCTION_TARGET_LEN {
        log::warn!("instruction exceeds target length ({} > {})", len, INSTRUCTION_TARGET_LEN);
    }
    Ok(())
}
