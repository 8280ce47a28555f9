//! Bot personalities
//!
//! A personality is pure data: a kind tag, the bot's name and any extra fields
//! (the teacher's subject). The prompt composer reads the framing sentence and
//! speaker labels from it; no variant carries behavior of its own.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Greeting every personality opens a session with
pub const OPENING_LINE: &str = "Hello! How can I help you today?";

/// Key under which the teacher's subject is stored
pub const SUBJECT_FIELD: &str = "subject";

/// Available personality variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PersonalityKind {
    /// Neutral chatbot
    #[value(alias = "default")]
    Base,
    /// Warm and cheerful assistant
    Friendly,
    /// Formal professor for a given subject
    #[value(alias = "professor")]
    Teacher,
}

impl PersonalityKind {
    pub fn all() -> [PersonalityKind; 3] {
        [PersonalityKind::Base, PersonalityKind::Friendly, PersonalityKind::Teacher]
    }

    /// Short description for listings
    pub fn description(&self) -> &'static str {
        match self {
            PersonalityKind::Base => "Generic chatbot with neutral framing",
            PersonalityKind::Friendly => "Casual, warm and cheerful assistant",
            PersonalityKind::Teacher => "Formal professor specialising in a chosen subject",
        }
    }

    /// Heading placed above the transcript when there is history
    pub fn history_heading(&self) -> &'static str {
        match self {
            PersonalityKind::Base => "Conversation History",
            PersonalityKind::Friendly => "Conversation so far",
            PersonalityKind::Teacher => "Previous conversation",
        }
    }

    /// Whether this variant reads the subject field
    pub fn needs_subject(&self) -> bool {
        matches!(self, PersonalityKind::Teacher)
    }
}

impl fmt::Display for PersonalityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

impl std::str::FromStr for PersonalityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" | "default" => Ok(PersonalityKind::Base),
            "friendly" => Ok(PersonalityKind::Friendly),
            "teacher" | "professor" => Ok(PersonalityKind::Teacher),
            _ => Err(format!("Unknown personality: {}. Supported: base, friendly, teacher", s)),
        }
    }
}

/// A configured personality for one session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    kind: PersonalityKind,
    name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    extra: BTreeMap<String, String>,
}

impl Personality {
    pub fn new(kind: PersonalityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn base(name: impl Into<String>) -> Self {
        Self::new(PersonalityKind::Base, name)
    }

    pub fn friendly(name: impl Into<String>) -> Self {
        Self::new(PersonalityKind::Friendly, name)
    }

    pub fn teacher(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::new(PersonalityKind::Teacher, name).with_field(SUBJECT_FIELD, subject)
    }

    /// Attach an extra field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> PersonalityKind {
        self.kind
    }

    /// Name shown next to the bot's replies
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }

    pub fn subject(&self) -> Option<&str> {
        self.field(SUBJECT_FIELD)
    }

    pub fn opening_line(&self) -> &'static str {
        OPENING_LINE
    }

    /// First line of every prompt
    pub fn framing(&self) -> String {
        match self.kind {
            PersonalityKind::Base => "The following is a conversation between a user and a chatbot.".to_string(),
            PersonalityKind::Friendly => format!(
                "Hi! I'm {}, your friendly assistant. I'm here to help and chat in a warm and cheerful way.",
                self.name
            ),
            PersonalityKind::Teacher => format!(
                "Hello, I am Professor {}, a specialist in {}. \
                 I will provide clear and thoughtful explanations to help you understand the subject matter.",
                self.name,
                self.subject().unwrap_or_default()
            ),
        }
    }

    pub fn history_heading(&self) -> &'static str {
        self.kind.history_heading()
    }

    pub fn user_label(&self) -> &'static str {
        match self.kind {
            PersonalityKind::Base | PersonalityKind::Friendly => "User",
            PersonalityKind::Teacher => "Student",
        }
    }

    pub fn bot_label(&self) -> String {
        match self.kind {
            PersonalityKind::Base => "Bot".to_string(),
            PersonalityKind::Friendly => self.name.clone(),
            PersonalityKind::Teacher => format!("Professor {}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("friendly".parse::<PersonalityKind>().unwrap(), PersonalityKind::Friendly);
        assert_eq!("TEACHER".parse::<PersonalityKind>().unwrap(), PersonalityKind::Teacher);
        assert_eq!("professor".parse::<PersonalityKind>().unwrap(), PersonalityKind::Teacher);
        assert_eq!("default".parse::<PersonalityKind>().unwrap(), PersonalityKind::Base);
        assert!("pirate".parse::<PersonalityKind>().is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PersonalityKind::Base.to_string(), "base");
        assert_eq!(PersonalityKind::Teacher.to_string(), "teacher");
    }

    #[test]
    fn test_base_labels() {
        let bot = Personality::base("Bot");
        assert_eq!(bot.user_label(), "User");
        assert_eq!(bot.bot_label(), "Bot");
        assert_eq!(
            bot.framing(),
            "The following is a conversation between a user and a chatbot."
        );
    }

    #[test]
    fn test_friendly_labels() {
        let bot = Personality::friendly("Joy");
        assert_eq!(bot.user_label(), "User");
        assert_eq!(bot.bot_label(), "Joy");
        assert!(bot.framing().contains("Joy"));
        assert!(bot.framing().contains("friendly"));
        assert_eq!(bot.history_heading(), "Conversation so far");
    }

    #[test]
    fn test_teacher_labels_and_subject() {
        let bot = Personality::teacher("Prof. Smith", "math");
        assert_eq!(bot.user_label(), "Student");
        assert_eq!(bot.bot_label(), "Professor Prof. Smith");
        assert_eq!(bot.subject(), Some("math"));
        assert!(bot.framing().starts_with("Hello, I am Professor Prof. Smith, a specialist in math. "));
    }

    #[test]
    fn test_teacher_without_subject_is_tolerated() {
        let bot = Personality::new(PersonalityKind::Teacher, "Ada");
        assert_eq!(bot.subject(), None);
        assert!(bot.framing().contains("a specialist in ."));
    }

    #[test]
    fn test_all_share_opening_line() {
        for kind in PersonalityKind::all() {
            assert_eq!(Personality::new(kind, "x").opening_line(), OPENING_LINE);
        }
    }

    #[test]
    fn test_deserialize() {
        let yaml = r#"
kind: teacher
name: Prof. Smith
extra:
  subject: history
"#;
        let bot: Personality = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(bot.kind(), PersonalityKind::Teacher);
        assert_eq!(bot.subject(), Some("history"));
    }
}
