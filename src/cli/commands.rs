//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: drive a goal through the full loop
//! - observe / plan / exec: one-shot skill-style entry points
//! - serve: start the HTTP execution gateway
//! - skills: list loaded skill descriptors

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// screenpilot - goal-driven phone automation loop
#[derive(Parser, Debug)]
#[command(name = "screenpilot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive a goal: observe, plan, confirm, execute until done
    Run {
        /// Goal as free text, or a JSON payload
        /// {"goal": ..., "max_rounds": ..., "stop_keywords": [...]}
        goal: String,

        /// Override the round budget
        #[arg(short, long)]
        max_rounds: Option<u32>,

        /// Stop keyword proving the goal was achieved (repeatable)
        #[arg(short, long = "stop-keyword")]
        stop_keyword: Vec<String>,
    },

    /// Capture and print the current screen snapshot
    Observe,

    /// Plan one next instruction for a goal against the current screen
    Plan {
        /// Goal as free text or a JSON payload
        goal: String,
    },

    /// Execute one instruction through the Execution Gateway
    Exec {
        /// Natural-language instruction for the agent
        instruction: String,
    },

    /// Start the HTTP execution gateway
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// List loaded skill descriptors
    Skills,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::parse_from([
            "screenpilot",
            "run",
            "reach settings",
            "--max-rounds",
            "5",
            "--stop-keyword",
            "Settings",
        ]);
        match cli.command {
            Commands::Run {
                goal,
                max_rounds,
                stop_keyword,
            } => {
                assert_eq!(goal, "reach settings");
                assert_eq!(max_rounds, Some(5));
                assert_eq!(stop_keyword, vec!["Settings"]);
            }
            other => panic!("expected Run, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_exec_command() {
        let cli = Cli::parse_from(["screenpilot", "exec", "tap Settings"]);
        assert!(matches!(cli.command, Commands::Exec { .. }));
    }

    #[test]
    fn test_parse_serve_with_overrides() {
        let cli = Cli::parse_from(["screenpilot", "serve", "--port", "9100"]);
        match cli.command {
            Commands::Serve { host, port } => {
                assert!(host.is_none());
                assert_eq!(port, Some(9100));
            }
            other => panic!("expected Serve, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["screenpilot", "--verbose", "observe"]);
        assert!(cli.is_verbose());
        assert!(matches!(cli.command, Commands::Observe));
    }
}
