//! screenpilot - goal-driven phone automation loop
//!
//! Drives a physical device toward a natural-language goal by repeatedly
//! observing its screen, planning one next action, executing it through a
//! bounded external agent, and re-observing - stopping on success, a round
//! budget, or a required human confirmation for sensitive actions.

pub mod coordinator;
pub mod device;
pub mod domain;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod observer;
pub mod planner;
pub mod skills;

pub use error::{PilotError, Result};
