//! Conversation session
//!
//! A session owns one personality and one memory. Each turn records the user's
//! input, builds a prompt from the remembered turns (the new input included),
//! asks the completion service for a reply and records that reply.

use crate::completion::{CompletionFailure, CompletionService};
use crate::memory::{Memory, Speaker};
use crate::personality::Personality;
use crate::prompt::compose;

/// Input that ends a conversation
pub const EXIT_COMMAND: &str = "quit";

/// Whether the user asked to leave
pub fn is_exit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case(EXIT_COMMAND)
}

pub struct Session {
    personality: Personality,
    memory: Memory,
    model: String,
}

impl Session {
    pub fn new(personality: Personality, model: impl Into<String>) -> Self {
        Self::with_memory(personality, Memory::new(), model)
    }

    pub fn with_memory(personality: Personality, memory: Memory, model: impl Into<String>) -> Self {
        Self {
            personality,
            memory,
            model: model.into(),
        }
    }

    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    pub fn history(&self) -> &Memory {
        &self.memory
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The bot's opening line, prefixed with its name
    pub fn greeting(&self) -> String {
        format!("{}: {}", self.personality.name(), self.personality.opening_line())
    }

    /// Prompt the next call to [`Session::respond`] would send, without recording anything
    pub fn compose_next(&self, input: &str) -> String {
        let mut memory = self.memory.clone();
        memory.append(Speaker::User, input);
        compose(&self.personality, &memory.render(), input)
    }

    /// Run one turn and return the bot's reply.
    ///
    /// The user turn stays recorded even when the completion fails; failures
    /// are returned as-is with no retry.
    pub fn respond<S>(&mut self, input: &str, service: &S) -> Result<String, CompletionFailure>
    where
        S: CompletionService + ?Sized,
    {
        self.memory.append(Speaker::User, input);

        let prompt = compose(&self.personality, &self.memory.render(), input);
        log::debug!(
            "Composed prompt for {} ({} chars, {} remembered turns)",
            self.personality.kind(),
            prompt.len(),
            self.memory.len()
        );

        let reply = service.complete(&prompt, &self.model)?;
        self.memory.append(Speaker::Bot, reply.as_str());
        Ok(reply)
    }
}
