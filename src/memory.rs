//! Conversation memory
//!
//! Keeps the most recent turns of a conversation in a bounded FIFO buffer and
//! renders them as a plain-text transcript for prompt construction.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Number of turns kept when no capacity is given
pub const DEFAULT_CAPACITY: usize = 3;

/// Who said something
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Bot,
}

impl Speaker {
    /// Capitalized label used in rendered transcripts
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Bot => "Bot",
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label().to_lowercase())
    }
}

impl std::str::FromStr for Speaker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" | "you" => Ok(Speaker::User),
            "bot" | "assistant" => Ok(Speaker::Bot),
            _ => Err(format!("Unknown speaker: {}. Supported: user, bot", s)),
        }
    }
}

/// One recorded utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    speaker: Speaker,
    text: String,
}

impl Turn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }

    pub fn speaker(&self) -> Speaker {
        self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker.label(), self.text)
    }
}

/// Parses `speaker:text`, e.g. `user:hi` or `bot: hello there`
impl std::str::FromStr for Turn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (speaker, text) = s
            .split_once(':')
            .ok_or_else(|| format!("Expected <speaker>:<text>, got: {}", s))?;
        Ok(Turn::new(speaker.parse()?, text.trim()))
    }
}

/// Bounded conversation history, oldest turn first
#[derive(Debug, Clone)]
pub struct Memory {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl Memory {
    /// Create an empty memory holding [`DEFAULT_CAPACITY`] turns
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty memory holding at most `capacity` turns (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            turns: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a turn, evicting the oldest ones once over capacity
    pub fn append(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push_back(Turn::new(speaker, text));
        while self.turns.len() > self.capacity {
            if let Some(evicted) = self.turns.pop_front() {
                log::trace!("Evicted {} turn from memory", evicted.speaker());
            }
        }
    }

    /// Render the transcript, one `Speaker: text` line per turn
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|turn| turn.to_string())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    pub fn turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
