//! Interactive chat command
//!
//! Picks a personality (from flags or the numeric menu), greets the user and
//! runs the read-respond loop until `quit` or end of input.

use colored::*;
use eyre::{Context, Result};
use std::io::{self, BufRead, Write};

use crate::cli::PersonalityArgs;
use crate::completion::{CompletionService, GroqClient};
use crate::config::{BotsConfig, Config};
use crate::memory::Memory;
use crate::personality::{Personality, PersonalityKind};
use crate::session::{Session, is_exit};

pub fn run(args: PersonalityArgs, model: Option<String>, config: &Config) -> Result<()> {
    let client = GroqClient::from_config(&config.completion).context("Failed to set up completion client")?;
    let model = model.unwrap_or_else(|| config.completion.model.clone());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    let Some(personality) = select_personality(&args, &config.bots, &mut input, &mut output)? else {
        log::info!("Input closed before a personality was chosen");
        return Ok(());
    };

    let memory = Memory::with_capacity(config.history.capacity);
    let mut session = Session::with_memory(personality, memory, model);
    converse(&mut session, &client, &mut input, &mut output)
}

/// Resolve the personality from flags, falling back to the interactive menu.
///
/// Returns `None` if input ends before a choice is made.
pub fn select_personality<R: BufRead, W: Write>(
    args: &PersonalityArgs,
    bots: &BotsConfig,
    input: &mut R,
    output: &mut W,
) -> Result<Option<Personality>> {
    let kind = match args.personality {
        Some(kind) => kind,
        None => {
            writeln!(output, "{}", "Choose your chatbot:".bold())?;
            writeln!(output, "1. Friendly Bot")?;
            writeln!(output, "2. Teacher Bot")?;
            let Some(choice) = ask(input, output, "Enter 1 or 2: ")? else {
                return Ok(None);
            };
            menu_choice(&choice)
        }
    };

    let subject = match (kind, &args.subject) {
        (PersonalityKind::Teacher, None) => match ask(input, output, "What subject should I teach? ")? {
            Some(subject) => Some(subject),
            None => return Ok(None),
        },
        (_, subject) => subject.clone(),
    };

    Ok(Some(bots.personality(kind, args.name.as_deref(), subject.as_deref())))
}

/// Exactly `1` picks the friendly bot; anything else (` 1` included) picks the teacher
pub fn menu_choice(choice: &str) -> PersonalityKind {
    if choice == "1" {
        PersonalityKind::Friendly
    } else {
        PersonalityKind::Teacher
    }
}

/// Run the conversation loop until the user quits or input ends.
///
/// Each line is trimmed and sent as-is, blank lines included.
pub fn converse<S, R, W>(session: &mut Session, service: &S, input: &mut R, output: &mut W) -> Result<()>
where
    S: CompletionService + ?Sized,
    R: BufRead,
    W: Write,
{
    let personality = session.personality();
    log::info!(
        "Starting {} session as '{}' with model={} (remembering {} turns)",
        personality.kind(),
        personality.name(),
        session.model(),
        session.history().capacity()
    );

    writeln!(output)?;
    writeln!(output, "{}", session.greeting())?;

    let mut turns = 0;
    while let Some(line) = ask(input, output, "You: ")? {
        let line = line.trim();
        if is_exit(line) {
            break;
        }

        let reply = session.respond(line, service).context("Failed to get a response")?;
        writeln!(output, "{}: {}", session.personality().name(), reply)?;
        turns += 1;
    }

    log::info!(
        "Session ended after {} turns ({} remembered)",
        turns,
        session.history().len()
    );
    Ok(())
}

/// Print a prompt and read one line without its line ending; `None` on end of input
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        writeln!(output)?;
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
}
