//! Domain types for screenpilot
//!
//! This module contains all core domain types:
//! - Goal: the natural-language target plus stop keywords and round budget
//! - ScreenSnapshot: immutable capture of on-device visible state
//! - Instruction: one short directive produced by the Planner
//! - ExecutionResult: bounded report from one Execution Gateway call
//! - Round / LoopState / LoopSummary: the Loop Coordinator's record keeping

pub mod execution;
pub mod goal;
pub mod instruction;
pub mod snapshot;
pub mod state;

pub use execution::{ExecutionResult, TAIL_LIMIT, tail};
pub use goal::{DEFAULT_MAX_ROUNDS, Goal, GoalPayload, parse_goal_arg};
pub use instruction::{INSTRUCTION_HARD_CAP, INSTRUCTION_TARGET_LEN, Instruction};
pub use snapshot::{ScreenSnapshot, UiElement};
pub use state::{LoopState, LoopStatus, LoopSummary, Round, RoundBrief};
