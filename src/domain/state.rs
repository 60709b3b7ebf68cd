//! Loop Coordinator record keeping: rounds, loop state, terminal summary.

use serde::{Deserialize, Serialize};

use crate::domain::execution::ExecutionResult;
use crate::domain::goal::Goal;
use crate::domain::instruction::Instruction;
use crate::domain::snapshot::ScreenSnapshot;

/// Status of one loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopStatus {
    /// Actively cycling observe -> plan -> execute
    Running,
    /// Suspended on a sensitive instruction pending explicit confirmation
    AwaitingConfirmation,
    /// A stop keyword appeared in observed text
    Achieved,
    /// Round budget consumed without reaching the goal (bounded-effort
    /// stop, not an error)
    MaxRoundsExceeded,
    /// A capability fault or an operator rejection ended the loop
    Failed,
}

impl LoopStatus {
    /// Returns true if the loop can never resume from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoopStatus::Achieved | LoopStatus::MaxRoundsExceeded | LoopStatus::Failed
        )
    }
}

/// One observe -> plan -> (confirm) -> execute -> observe cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    /// 1-based index, strictly increasing within one loop invocation
    pub index: u32,

    /// The snapshot the instruction was planned against
    pub snapshot_before: ScreenSnapshot,

    /// The instruction that was executed
    pub instruction: Instruction,

    /// What the Execution Gateway reported
    pub result: ExecutionResult,

    /// The re-observation after execution; absent when execution failed
    /// and the loop terminated before re-observing
    pub snapshot_after: Option<ScreenSnapshot>,
}

/// Abbreviated round record for the terminal summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundBrief {
    pub index: u32,
    pub instruction: String,
    pub success: bool,
}

impl From<&Round> for RoundBrief {
    fn from(round: &Round) -> Self {
        Self {
            index: round.index,
            instruction: round.instruction.text.clone(),
            success: round.result.success,
        }
    }
}

/// State owned exclusively by the Loop Coordinator for one invocation.
///
/// History is append-only for the lifetime of the invocation and
/// discarded when the loop terminates.
#[derive(Debug, Clone)]
pub struct LoopState {
    pub goal: Goal,
    pub current_round: u32,
    pub history: Vec<Round>,
    pub status: LoopStatus,
}

impl LoopState {
    /// Start a fresh invocation with zero consumed rounds.
    pub fn new(goal: Goal) -> Self {
        Self {
            goal,
            current_round: 0,
            history: vec![],
            status: LoopStatus::Running,
        }
    }

    /// The 1-based index the next round will consume.
    pub fn next_round_index(&self) -> u32 {
        self.current_round + 1
    }

    /// Append a completed round. Indices are assigned here so they are
    /// strictly increasing starting at 1.
    pub fn record_round(
        &mut self,
        snapshot_before: ScreenSnapshot,
        instruction: Instruction,
        result: ExecutionResult,
        snapshot_after: Option<ScreenSnapshot>,
    ) {
        self.current_round += 1;
        self.history.push(Round {
            index: self.current_round,
            snapshot_before,
            instruction,
            result,
            snapshot_after,
        });
    }

    /// True when the round budget is exhausted.
    pub fn budget_exhausted(&self) -> bool {
        self.current_round >= self.goal.max_rounds
    }

    /// Produce the terminal report.
    pub fn summarize(&self, diagnostic: Option<String>) -> LoopSummary {
        LoopSummary {
            goal: self.goal.text.clone(),
            status: self.status,
            rounds: self.current_round,
            diagnostic,
            history: self.history.iter().map(RoundBrief::from).collect(),
        }
    }
}

/// Terminal report for one loop invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopSummary {
    pub goal: String,
    pub status: LoopStatus,
    pub rounds: u32,
    /// Most recent diagnostic text, already bounded to the tail limit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    pub history: Vec<RoundBrief>,
}
