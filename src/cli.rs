use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::memory::Turn;
use crate::personality::PersonalityKind;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "chatbot",
    about = "Chat with a personality-driven bot backed by a remote LLM",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/chatbot/logs/chatbot.log\n\nThe API key is read from $GROQ_API_KEY or ~/.config/chatbot/.env"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to chatbot.yaml config file")]
    pub config: Option<PathBuf>,

    /// Subcommand (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Personality selection shared by `chat` and `prompt`
#[derive(Args, Debug, Clone, Default)]
pub struct PersonalityArgs {
    /// Personality to use (skips the menu in `chat`)
    #[arg(long, short = 'p', value_enum)]
    pub personality: Option<PersonalityKind>,

    /// Bot name (defaults to the configured name for the personality)
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Subject taught by the teacher personality
    #[arg(long, short = 's')]
    pub subject: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive conversation
    Chat {
        #[command(flatten)]
        personality: PersonalityArgs,

        /// Model identifier (overrides config)
        #[arg(long, short = 'm')]
        model: Option<String>,
    },

    /// Print the prompt that would be sent for an input, without calling the API
    Prompt {
        /// The user's message
        input: String,

        #[command(flatten)]
        personality: PersonalityArgs,

        /// Earlier turn as `user:TEXT` or `bot:TEXT` (repeatable, oldest first)
        #[arg(long = "turn", short = 't')]
        turns: Vec<Turn>,
    },

    /// List available personalities
    Personalities {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["chatbot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_chat_with_personality() {
        let cli = Cli::try_parse_from(["chatbot", "chat", "-p", "teacher", "--subject", "math"]).unwrap();
        match cli.command {
            Some(Commands::Chat { personality, model }) => {
                assert_eq!(personality.personality, Some(PersonalityKind::Teacher));
                assert_eq!(personality.subject.as_deref(), Some("math"));
                assert!(model.is_none());
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_parse_prompt_turns() {
        let cli = Cli::try_parse_from([
            "chatbot",
            "prompt",
            "and now?",
            "--turn",
            "user:hi",
            "--turn",
            "bot:hello",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Prompt { input, turns, .. }) => {
                assert_eq!(input, "and now?");
                assert_eq!(turns.len(), 2);
                assert_eq!(turns[1].text(), "hello");
            }
            _ => panic!("expected prompt command"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_turn() {
        assert!(Cli::try_parse_from(["chatbot", "prompt", "x", "--turn", "nobody"]).is_err());
    }
}
