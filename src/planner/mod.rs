//! Planner - proposes exactly one short next instruction per call.
//!
//! The planner sees the goal, the round history, and the latest snapshot.
//! It may instead flag `insufficient_info` (the coordinator re-observes)
//! and must flag `sensitive` on instructions matching a configured
//! high-consequence category. It never assumes authority to confirm
//! sensitive actions on the operator's behalf.

pub mod llm;
pub mod sensitive;

pub use llm::{LlmPlanner, LlmPlannerConfig};
pub use sensitive::SensitivePolicy;

use async_trait::async_trait;

use crate::domain::{Goal, Instruction, Round, ScreenSnapshot};
use crate::error::Result;

/// Chooses the next step toward the goal from the latest observed state.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(
        &self,
        goal: &Goal,
        history: &[Round],
        snapshot: &ScreenSnapshot,
    ) -> Result<Instruction>;
}
