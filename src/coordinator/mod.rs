//! Loop Coordinator - the orchestrator and only holder of cross-call state.
//!
//! Sequences Observer -> Planner -> (confirmation gate) -> Execution
//! Gateway -> Observer, tracks the round budget, evaluates goal
//! achievement against stop keywords, and produces the terminal summary.
//!
//! Every capability fault terminates the loop in Failed with the
//! diagnostic attached - nothing is retried, because blind retries against
//! a stateful physical device compound side effects. The one recoverable
//! case is `insufficient_info`, which triggers a re-observation without
//! consuming a round.

pub mod confirm;

pub use confirm::{ConfirmationDecision, ConfirmationPrompt, Confirmer};

use std::sync::Arc;

use crate::domain::{Goal, Instruction, LoopState, LoopStatus, LoopSummary};
use crate::error::Result;
use crate::executor::CommandExecutor;
use crate::observer::Observer;
use crate::planner::Planner;

/// Cap on consecutive insufficient_info re-observations. The spec leaves
/// this unbounded; an unbounded loop against a planner that never commits
/// would spin forever, so progress is required within this many looks.
const MAX_CONSECUTIVE_REOBSERVATIONS: u32 = 3;

/// The closed-loop orchestrator for one goal at a time.
pub struct LoopCoordinator<O, P, E, C>
where
    O: Observer,
    P: Planner,
    E: CommandExecutor,
    C: Confirmer,
{
    observer: Arc<O>,
    planner: Arc<P>,
    executor: Arc<E>,
    confirmer: Arc<C>,
}

impl<O, P, E, C> LoopCoordinator<O, P, E, C>
where
    O: Observer,
    P: Planner,
    E: CommandExecutor,
    C: Confirmer,
{
    pub fn new(observer: Arc<O>, planner: Arc<P>, executor: Arc<E>, confirmer: Arc<C>) -> Self {
        Self {
            observer,
            planner,
            executor,
            confirmer,
        }
    }

    /// Drive the goal to a terminal state and report.
    ///
    /// Always returns a summary: capability faults become status Failed
    /// with the diagnostic attached, never a panic or a raw error.
    pub async fn run(&self, goal: Goal) -> LoopSummary {
        if let Err(e) = goal.validate() {
            let mut state = LoopState::new(goal);
            state.status = LoopStatus::Failed;
            return state.summarize(Some(e.to_string()));
        }

        let mut state = LoopState::new(goal);
        log::info!(
            "loop started: goal=\"{}\" max_rounds={}",
            state.goal.text,
            state.goal.max_rounds
        );

        // Observing
        let mut snapshot = match self.observer.observe().await {
            Ok(s) => s,
            Err(e) => return Self::fail(state, e.to_string()),
        };

        let mut reobservations = 0u32;
        loop {
            // Planning
            let instruction = match self
                .planner
                .plan(&state.goal, &state.history, &snapshot)
                .await
            {
                Ok(i) => i,
                Err(e) => return Self::fail(state, e.to_string()),
            };

            if instruction.insufficient_info {
                reobservations += 1;
                if reobservations > MAX_CONSECUTIVE_REOBSERVATIONS {
                    return Self::fail(
                        state,
                        format!(
                            "planner made no progress after {} re-observations",
                            MAX_CONSECUTIVE_REOBSERVATIONS
                        ),
                    );
                }
                log::info!("re-observing (no round consumed)");
                snapshot = match self.observer.observe().await {
                    Ok(s) => s,
                    Err(e) => return Self::fail(state, e.to_string()),
                };
                continue;
            }
            reobservations = 0;

            // Confirmation gate for sensitive instructions
            if instruction.sensitive {
                state.status = LoopStatus::AwaitingConfirmation;
                match self.await_confirmation(&state, &instruction).await {
                    Ok(ConfirmationDecision::Confirm) => {
                        state.status = LoopStatus::Running;
                    }
                    Ok(_) => {
                        // Explicit operator abort of the suspended loop
                        state.status = LoopStatus::Failed;
                        return state
                            .summarize(Some("instruction rejected by operator".to_string()));
                    }
                    Err(e) => return Self::fail(state, e.to_string()),
                }
            }

            // Controlling - consumes one round
            log::info!(
                "round {}: executing \"{}\"",
                state.next_round_index(),
                instruction.text
            );
            let result = self.executor.run(&instruction.text).await;

            if !result.success {
                let diagnostic = result
                    .stderr_tail
                    .clone()
                    .unwrap_or_else(|| "execution failed".to_string());
                state.record_round(snapshot, instruction, result, None);
                return Self::fail(state, diagnostic);
            }

            // Evaluating - the fresh snapshot closes this round and opens
            // the next one
            let after = match self.observer.observe().await {
                Ok(s) => s,
                Err(e) => {
                    let diagnostic = e.to_string();
                    state.record_round(snapshot, instruction, result, None);
                    return Self::fail(state, diagnostic);
                }
            };
            state.record_round(snapshot, instruction, result, Some(after.clone()));

            if after.contains_any(&state.goal.stop_keywords) {
                log::info!("goal achieved after {} round(s)", state.current_round);
                state.status = LoopStatus::Achieved;
                return state.summarize(None);
            }
            if state.budget_exhausted() {
                log::info!("round budget exhausted ({})", state.goal.max_rounds);
                state.status = LoopStatus::MaxRoundsExceeded;
                return state.summarize(None);
            }
            snapshot = after;
        }
    }

    /// Suspend on a sensitive instruction until the operator replies with
    /// an explicit confirm or reject. Unrecognized replies re-prompt; the
    /// loop stays suspended.
    async fn await_confirmation(
        &self,
        state: &LoopState,
        instruction: &Instruction,
    ) -> Result<ConfirmationDecision> {
        let prompt = ConfirmationPrompt {
            round: state.next_round_index(),
            pending_instruction: instruction.text.clone(),
            prompt: format!(
                "Sensitive instruction \"{}\" requires confirmation (yes/no)",
                instruction.text
            ),
        };

        loop {
            let reply = self.confirmer.request(&prompt).await?;
            match ConfirmationDecision::parse(&reply) {
                ConfirmationDecision::Unrecognized => {
                    log::info!("unrecognized confirmation reply {:?}, still suspended", reply);
                }
                decision => return Ok(decision),
            }
        }
    }

    fn fail(mut state: LoopState, diagnostic: String) -> LoopSummary {
        log::warn!("loop failed: {}", diagnostic);
        state.status = LoopStatus::Failed;
        state.summarize(Some(diagnostic))
    }
}
