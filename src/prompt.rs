//! Prompt composition

use crate::personality::Personality;

/// Build the completion prompt for one turn.
///
/// Layout:
///
/// ```text
/// <framing sentence>
/// <history heading>:        (only with history)
/// <rendered history>        (only with history)
/// <user label>: <input>
/// <bot label>:
/// ```
///
/// The trailing bot label is left open so the model continues as the bot.
pub fn compose(personality: &Personality, history: &str, user_input: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(&personality.framing());
    prompt.push('\n');

    if !history.is_empty() {
        prompt.push_str(&format!("{}:\n{}\n", personality.history_heading(), history));
    }

    prompt.push_str(&format!(
        "{}: {}\n{}:",
        personality.user_label(),
        user_input,
        personality.bot_label()
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{Memory, Speaker};

    #[test]
    fn test_base_without_history() {
        let prompt = compose(&Personality::base("Bot"), "", "hello");
        assert_eq!(
            prompt,
            "The following is a conversation between a user and a chatbot.\nUser: hello\nBot:"
        );
    }

    #[test]
    fn test_base_with_history() {
        let mut memory = Memory::new();
        memory.append(Speaker::User, "hi");
        memory.append(Speaker::Bot, "hello");

        let prompt = compose(&Personality::base("Bot"), &memory.render(), "how are you?");
        assert_eq!(
            prompt,
            "The following is a conversation between a user and a chatbot.\n\
             Conversation History:\nUser: hi\nBot: hello\n\
             User: how are you?\nBot:"
        );
    }

    #[test]
    fn test_friendly_prompt() {
        let prompt = compose(&Personality::friendly("Joy"), "", "hi");
        assert!(prompt.ends_with("User: hi\nJoy:"));

        let first_line = prompt.lines().next().unwrap();
        assert!(first_line.contains("Joy"));
        assert!(first_line.contains("friendly"));
        assert!(!prompt.contains("Conversation so far"));
    }

    #[test]
    fn test_friendly_history_heading() {
        let prompt = compose(&Personality::friendly("Joy"), "User: hey\nBot: hi!", "what's up");
        assert!(prompt.contains("\nConversation so far:\nUser: hey\nBot: hi!\n"));
        assert!(prompt.ends_with("User: what's up\nJoy:"));
    }

    #[test]
    fn test_teacher_prompt() {
        let prompt = compose(
            &Personality::teacher("Prof. Smith", "math"),
            "Student asked earlier",
            "explain fractions",
        );

        let first_line = prompt.lines().next().unwrap();
        assert!(first_line.contains("Professor Prof. Smith"));
        assert!(first_line.contains("math"));
        assert!(prompt.contains("Previous conversation:\n"));
        assert!(prompt.ends_with("Student: explain fractions\nProfessor Prof. Smith:"));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let bot = Personality::teacher("Prof. Smith", "biology");
        let a = compose(&bot, "User: cells?", "and mitochondria?");
        let b = compose(&bot, "User: cells?", "and mitochondria?");
        assert_eq!(a, b);
    }
}
