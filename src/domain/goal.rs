//! Goal: the natural-language target a loop drives the device toward.

use serde::{Deserialize, Serialize};

/// Default round budget when none is configured or supplied.
pub const DEFAULT_MAX_ROUNDS: u32 = 3;

/// An immutable natural-language target for one loop invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// What the operator wants the device to reach
    pub text: String,

    /// Substrings whose presence in observed text implies success
    #[serde(default)]
    pub stop_keywords: Vec<String>,

    /// Maximum rounds before the loop stops with MaxRoundsExceeded
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

impl Goal {
    /// Create a goal with the default round budget and no stop keywords.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stop_keywords: vec![],
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    /// Set the round budget.
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Set the stop keywords.
    pub fn with_stop_keywords(mut self, keywords: Vec<String>) -> Self {
        self.stop_keywords = keywords;
        self
    }

    /// Validate the goal invariants.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.text.trim().is_empty() {
            return Err(crate::error::PilotError::Config(
                "goal text must not be empty".to_string(),
            ));
        }
        if self.max_rounds == 0 {
            return Err(crate::error::PilotError::Config(
                "max_rounds must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// JSON payload accepted by operator-facing entry points.
///
/// `{"goal": "...", "max_rounds": 3, "stop_keywords": ["Settings"]}`
#[derive(Debug, Clone, Deserialize)]
pub struct GoalPayload {
    pub goal: String,
    #[serde(default)]
    pub max_rounds: Option<u32>,
    #[serde(default)]
    pub stop_keywords: Option<Vec<String>>,
}

impl GoalPayload {
    /// Convert the payload into a Goal, falling back to the given default
    /// round budget when the payload omits one.
    pub fn into_goal(self, default_max_rounds: u32) -> Goal {
        Goal {
            text: self.goal,
            stop_keywords: self.stop_keywords.unwrap_or_default(),
            max_rounds: self.max_rounds.unwrap_or(default_max_rounds),
        }
    }
}

/// Parse an operator argument as either free text or a JSON payload.
///
/// A leading `{` selects the JSON form; anything else is free text.
pub fn parse_goal_arg(raw: &str, default_max_rounds: u32) -> crate::error::Result<Goal> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') {
        let payload: GoalPayload = serde_json::from_str(trimmed)?;
        Ok(payload.into_goal(default_max_rounds))
    } else {
        Ok(Goal {
            text: trimmed.to_string(),
            stop_keywords: vec![],
            max_rounds: default_max_rounds,
        })
    }
}
