//! CLI module for screenpilot - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for the loop itself and
//! the four skill-style operations (observe, plan, exec, serve).

pub mod commands;

pub use commands::Cli;
