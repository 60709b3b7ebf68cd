//! Two-phase confirmation for sensitive instructions.
//!
//! The coordinator suspends, surfaces `{round, pending_instruction,
//! prompt}`, and resumes only on an explicit affirmative token. The
//! grammar is fixed and exact (no fuzzy matching): one trimmed,
//! lowercased word decides. Anything unrecognized keeps the loop
//! suspended; it never auto-cancels.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What the coordinator surfaces while suspended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    /// The round the pending instruction would consume
    pub round: u32,
    /// The sensitive instruction awaiting a decision
    pub pending_instruction: String,
    /// Operator-facing prompt text
    pub prompt: String,
}

/// Outcome of parsing one operator reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationDecision {
    /// Explicit affirmative: execute the pending instruction
    Confirm,
    /// Explicit negative: abort the suspended loop
    Reject,
    /// Anything else: no-op, remain suspended
    Unrecognized,
}

const AFFIRMATIVE: &[&str] = &["yes", "y", "confirm", "approve"];
const NEGATIVE: &[&str] = &["no", "n", "reject", "cancel", "abort"];

impl ConfirmationDecision {
    /// Parse one reply with the exact confirmation grammar.
    pub fn parse(reply: &str) -> Self {
        let token = reply.trim().to_lowercase();
        if AFFIRMATIVE.contains(&token.as_str()) {
            ConfirmationDecision::Confirm
        } else if NEGATIVE.contains(&token.as_str()) {
            ConfirmationDecision::Reject
        } else {
            ConfirmationDecision::Unrecognized
        }
    }
}

/// Channel through which the operator answers confirmation prompts.
///
/// One call surfaces the prompt and returns one raw reply; the
/// coordinator parses it and re-prompts while the reply is unrecognized.
#[async_trait]
pub trait Confirmer: Send + Sync {
    async fn request(&self, prompt: &ConfirmationPrompt) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affirmative_tokens() {
        for token in ["yes", "y", "confirm", "approve", "YES", "  Yes  "] {
            assert_eq!(
                ConfirmationDecision::parse(token),
                ConfirmationDecision::Confirm,
                "token: {token:?}"
            );
        }
    }

    #[test]
    fn test_negative_tokens() {
        for token in ["no", "n", "reject", "cancel", "abort", "No"] {
            assert_eq!(
                ConfirmationDecision::parse(token),
                ConfirmationDecision::Reject,
                "token: {token:?}"
            );
        }
    }

    #[test]
    fn test_unrecognized_replies() {
        for reply in ["", "maybe", "yes please", "ok", "sure", "yess"] {
            assert_eq!(
                ConfirmationDecision::parse(reply),
                ConfirmationDecision::Unrecognized,
                "reply: {reply:?}"
            );
        }
    }

    #[test]
    fn test_prompt_serialization_shape() {
        let prompt = ConfirmationPrompt {
            round: 2,
            pending_instruction: "send message to Bob".to_string(),
            prompt: "Confirm?".to_string(),
        };
        let json = serde_json::to_string(&prompt).unwrap();
        assert!(json.contains("\"round\":2"));
        assert!(json.contains("pending_instruction"));
    }
}
