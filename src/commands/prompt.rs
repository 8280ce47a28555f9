//! Preview the prompt a message would produce

use eyre::Result;

use crate::cli::PersonalityArgs;
use crate::config::Config;
use crate::memory::{Memory, Turn};
use crate::personality::PersonalityKind;
use crate::session::Session;

pub fn run(input: &str, args: &PersonalityArgs, turns: &[Turn], config: &Config) -> Result<()> {
    println!("{}", build(input, args, turns, config));
    Ok(())
}

/// Seed a memory with `turns` and compose the prompt `input` would be sent with
pub fn build(input: &str, args: &PersonalityArgs, turns: &[Turn], config: &Config) -> String {
    let kind = args.personality.unwrap_or(PersonalityKind::Base);
    let personality = config
        .bots
        .personality(kind, args.name.as_deref(), args.subject.as_deref());

    let mut memory = Memory::with_capacity(config.history.capacity);
    for turn in turns {
        memory.append(turn.speaker(), turn.text());
    }

    let session = Session::with_memory(personality, memory, config.completion.model.clone());
    session.compose_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Speaker;

    #[test]
    fn test_build_defaults_to_base() {
        let prompt = build("hello", &PersonalityArgs::default(), &[], &Config::default());
        assert_eq!(
            prompt,
            "The following is a conversation between a user and a chatbot.\n\
             Conversation History:\nUser: hello\n\
             User: hello\nBot:"
        );
    }

    #[test]
    fn test_build_keeps_only_recent_turns() {
        let turns = vec![
            Turn::new(Speaker::User, "one"),
            Turn::new(Speaker::Bot, "two"),
            Turn::new(Speaker::User, "three"),
            Turn::new(Speaker::Bot, "four"),
        ];
        let args = PersonalityArgs {
            personality: Some(PersonalityKind::Friendly),
            ..Default::default()
        };

        let prompt = build("five", &args, &turns, &Config::default());

        assert!(prompt.contains("Conversation so far:\nUser: three\nBot: four\nUser: five\n"));
        assert!(!prompt.contains("one"));
        assert!(!prompt.contains("two"));
        assert!(prompt.ends_with("User: five\nJoy:"));
    }
}
