use clap::Parser;
use eyre::{Context, Result};
use log::info;
use std::fs;

mod cli;
mod commands;
mod completion;
mod config;
mod memory;
mod personality;
mod prompt;
mod session;

use cli::{Cli, Commands};
use config::{Config, LogLevel};

/// Send log records to the chatbot log file so they never mix with the conversation
fn setup_logging(log_level: LogLevel) -> Result<()> {
    let log_file = Config::log_file();
    if let Some(dir) = log_file.parent() {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    }

    let sink = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let from_env = std::env::var_os("RUST_LOG").is_some();
    let mut builder = env_logger::Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(log_level.into());
    }
    builder.target(env_logger::Target::Pipe(Box::new(sink))).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    info!(
        "Log level: {}",
        if from_env { "from RUST_LOG".to_string() } else { log_level.as_filter().to_string() }
    );
    Ok(())
}

fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        None => commands::chat::run(cli::PersonalityArgs::default(), None, &config),
        Some(Commands::Chat { personality, model }) => commands::chat::run(personality, model, &config),
        Some(Commands::Prompt {
            input,
            personality,
            turns,
        }) => commands::prompt::run(&input, &personality, &turns, &config),
        Some(Commands::Personalities { format }) => {
            commands::personalities::run(cli::OutputFormat::resolve(format), &config)
        }
        Some(Commands::Config { action }) => commands::config::run(action, &config),
        Some(Commands::Completions { shell }) => commands::completions::run(shell),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first
    let cli = Cli::parse();

    // Load configuration (before logging, so log messages in Config::load are silent)
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with log level from config (or RUST_LOG env var)
    setup_logging(config.log_level).context("Failed to setup logging")?;

    info!("Starting chatbot with config from: {:?}", cli.config);

    // Run the command
    run(cli, config).context("Command failed")?;

    Ok(())
}
