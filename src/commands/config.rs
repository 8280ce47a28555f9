use colored::*;
use eyre::Result;

use crate::cli::{ConfigAction, OutputFormat};
use crate::config::Config;

pub fn run(action: ConfigAction, config: &Config) -> Result<()> {
    match action {
        ConfigAction::Show { format } => show(OutputFormat::resolve(format), config),
    }
}

fn show(format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(config)?);
        }
        OutputFormat::Text => {
            println!("{}", "Chatbot Configuration".bold());
            println!();

            println!("{}: {}", "log_level".cyan(), config.log_level.as_filter());
            println!();

            println!("{}:", "completion".cyan());
            println!("  endpoint: {}", config.completion.endpoint);
            println!("  model: {}", config.completion.model);
            println!("  api_key_env: {}", config.completion.api_key_env);
            println!("  timeout_secs: {}", config.completion.timeout_secs);
            println!();

            println!("{}:", "history".cyan());
            println!("  capacity: {}", config.history.capacity);
            println!();

            println!("{}:", "bots".cyan());
            println!("  base_name: {}", config.bots.base_name);
            println!("  friendly_name: {}", config.bots.friendly_name);
            println!("  teacher_name: {}", config.bots.teacher_name);
            println!();

            println!("{}: {}", "config dir".dimmed(), Config::app_dir().display());
        }
    }

    Ok(())
}
