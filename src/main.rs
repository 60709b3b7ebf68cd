use async_trait::async_trait;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

mod cli;
mod config;

use cli::Cli;
use cli::commands::Commands;
use config::Config;

use screenpilot::coordinator::{ConfirmationPrompt, Confirmer, LoopCoordinator};
use screenpilot::device::{DeviceId, DeviceLock};
use screenpilot::domain::{LoopStatus, parse_goal_arg};
use screenpilot::executor::{CommandExecutor, ProcessExecutor};
use screenpilot::gateway;
use screenpilot::observer::{Observer, ProcessObserver};
use screenpilot::planner::{LlmPlanner, LlmPlannerConfig, Planner};
use screenpilot::skills::SkillSet;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("screenpilot")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("screenpilot.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

/// Confirmer that surfaces the pending instruction on the terminal and
/// reads one reply per attempt from stdin.
struct StdinConfirmer;

#[async_trait]
impl Confirmer for StdinConfirmer {
    async fn request(&self, prompt: &ConfirmationPrompt) -> screenpilot::Result<String> {
        println!(
            "{} round {} pending: {}",
            "Confirmation required".yellow().bold(),
            prompt.round,
            prompt.pending_instruction.cyan()
        );
        println!("{}", prompt.prompt);

        let mut line = String::new();
        let mut reader = BufReader::new(tokio::io::stdin());
        reader.read_line(&mut line).await?;
        Ok(line)
    }
}

fn build_executor(config: &Config, lock: Arc<DeviceLock>) -> ProcessExecutor {
    ProcessExecutor::new(
        config.executor.command.clone(),
        config.executor.workdir.clone(),
        DeviceId::new(&config.device.serial),
        Duration::from_secs(config.executor.timeout_secs),
        lock,
    )
}

fn build_observer(config: &Config, lock: Arc<DeviceLock>) -> ProcessObserver {
    ProcessObserver::new(
        config.observer.command.clone(),
        DeviceId::new(&config.device.serial),
        Duration::from_secs(config.observer.timeout_secs),
        lock,
    )
}

fn build_planner(config: &Config) -> Result<LlmPlanner> {
    let planner_config = LlmPlannerConfig {
        base_url: config.planner.base_url.clone(),
        model: config.planner.model.clone(),
        timeout: Duration::from_secs(config.planner.timeout_secs),
    };
    Ok(LlmPlanner::new(planner_config, config.sensitive.clone())?)
}

fn status_label(status: LoopStatus) -> ColoredString {
    match status {
        LoopStatus::Achieved => "achieved".green().bold(),
        LoopStatus::MaxRoundsExceeded => "max rounds exceeded".yellow().bold(),
        LoopStatus::Failed => "failed".red().bold(),
        LoopStatus::Running => "running".normal(),
        LoopStatus::AwaitingConfirmation => "awaiting confirmation".yellow(),
    }
}

async fn handle_run(
    goal_arg: &str,
    max_rounds: Option<u32>,
    stop_keywords: &[String],
    config: &Config,
) -> Result<()> {
    let mut goal = parse_goal_arg(goal_arg, config.coordinator.default_max_rounds)?;
    if let Some(rounds) = max_rounds {
        goal.max_rounds = rounds;
    }
    if !stop_keywords.is_empty() {
        goal.stop_keywords = stop_keywords.to_vec();
    }

    info!("Starting loop for goal: {}", goal.text);
    println!("{} {}", "Goal:".green(), goal.text);

    let lock = DeviceLock::new();
    let coordinator = LoopCoordinator::new(
        Arc::new(build_observer(config, Arc::clone(&lock))),
        Arc::new(build_planner(config)?),
        Arc::new(build_executor(config, lock)),
        Arc::new(StdinConfirmer),
    );

    let summary = coordinator.run(goal).await;

    println!(
        "{} {} after {} round(s)",
        "Result:".green(),
        status_label(summary.status),
        summary.rounds
    );
    if let Some(diagnostic) = &summary.diagnostic {
        println!("{} {}", "Diagnostic:".red(), diagnostic);
    }
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn handle_observe(config: &Config) -> Result<()> {
    let observer = build_observer(config, DeviceLock::new());
    let snapshot = observer.observe().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn handle_plan(goal_arg: &str, config: &Config) -> Result<()> {
    let goal = parse_goal_arg(goal_arg, config.coordinator.default_max_rounds)?;
    let observer = build_observer(config, DeviceLock::new());
    let planner = build_planner(config)?;

    let snapshot = observer.observe().await?;
    let instruction = planner.plan(&goal, &[], &snapshot).await?;
    println!("{}", serde_json::to_string_pretty(&instruction)?);
    Ok(())
}

async fn handle_exec(instruction: &str, config: &Config) -> Result<()> {
    let executor = build_executor(config, DeviceLock::new());
    let result = executor.run(instruction).await;

    let label = if result.success {
        "ok".green()
    } else {
        "failed".red()
    };
    println!("{} {} ({:.1}s)", "Execution:".green(), label, result.duration);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn handle_serve(host: Option<&str>, port: Option<u16>, config: &Config) -> Result<()> {
    let host = host.unwrap_or(&config.gateway.host);
    let port = port.unwrap_or(config.gateway.port);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid gateway address")?;

    let executor: Arc<dyn CommandExecutor> = Arc::new(build_executor(config, DeviceLock::new()));

    println!("{} {}", "Gateway listening on".cyan(), addr);
    gateway::serve(
        addr,
        executor,
        Duration::from_secs(config.executor.timeout_secs),
    )
    .await?;
    Ok(())
}

fn handle_skills(config: &Config) -> Result<()> {
    let skills = SkillSet::load(&config.skills.dir)?;
    if skills.is_empty() {
        println!(
            "{} (directory: {})",
            "No skills loaded".yellow(),
            config.skills.dir.display()
        );
        return Ok(());
    }
    for skill in skills.list() {
        println!(
            "{} [{:?}] {}",
            skill.name.green(),
            skill.operation,
            skill.description
        );
        if let Some(usage) = &skill.usage {
            println!("    usage: {}", usage);
        }
    }
    Ok(())
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Run {
            goal,
            max_rounds,
            stop_keyword,
        } => handle_run(goal, *max_rounds, stop_keyword, config).await,
        Commands::Observe => handle_observe(config).await,
        Commands::Plan { goal } => handle_plan(goal, config).await,
        Commands::Exec { instruction } => handle_exec(instruction, config).await,
        Commands::Serve { host, port } => handle_serve(host.as_deref(), *port, config).await,
        Commands::Skills => handle_skills(config),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
