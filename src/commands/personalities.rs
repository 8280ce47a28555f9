//! List the available personalities

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::personality::PersonalityKind;

#[derive(Debug, Serialize)]
struct PersonalitySummary {
    kind: PersonalityKind,
    description: &'static str,
    default_name: String,
    user_label: &'static str,
    bot_label: String,
    history_heading: &'static str,
    needs_subject: bool,
}

fn summaries(config: &Config) -> Vec<PersonalitySummary> {
    PersonalityKind::all()
        .into_iter()
        .map(|kind| {
            let personality = config.bots.personality(kind, None, None);
            PersonalitySummary {
                kind,
                description: kind.description(),
                default_name: personality.name().to_string(),
                user_label: personality.user_label(),
                bot_label: personality.bot_label(),
                history_heading: personality.history_heading(),
                needs_subject: kind.needs_subject(),
            }
        })
        .collect()
}

pub fn run(format: OutputFormat, config: &Config) -> Result<()> {
    let summaries = summaries(config);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summaries)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&summaries)?),
        OutputFormat::Text => {
            println!("{}", "Available Personalities:".bold());
            println!();

            for summary in &summaries {
                println!("  {} {}", "●".green(), summary.kind.to_string().bold());
                println!("    {}", summary.description.dimmed());
                println!("    Name: {}", summary.default_name.cyan());
                println!("    Labels: {} / {}", summary.user_label, summary.bot_label.yellow());
                if summary.needs_subject {
                    println!("    Requires: {}", "--subject".magenta());
                }
                println!();
            }
        }
    }

    Ok(())
}
