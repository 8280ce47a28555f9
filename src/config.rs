use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::memory::DEFAULT_CAPACITY;
use crate::personality::{Personality, PersonalityKind};

/// Main chatbot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub completion: CompletionConfig,
    pub history: HistoryConfig,
    pub bots: BotsConfig,
}

/// Log verbosity
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Chat completions endpoint
    pub endpoint: String,
    /// Model identifier passed with every request
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Whole-request timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Number of turns remembered
    pub capacity: usize,
}

/// Default bot names per personality
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BotsConfig {
    pub base_name: String,
    pub friendly_name: String,
    pub teacher_name: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl Default for BotsConfig {
    fn default() -> Self {
        Self {
            base_name: "Bot".to_string(),
            friendly_name: "Joy".to_string(),
            teacher_name: "Prof. Smith".to_string(),
        }
    }
}

impl BotsConfig {
    pub fn default_name(&self, kind: PersonalityKind) -> &str {
        match kind {
            PersonalityKind::Base => &self.base_name,
            PersonalityKind::Friendly => &self.friendly_name,
            PersonalityKind::Teacher => &self.teacher_name,
        }
    }

    /// Build a personality, falling back to the configured name
    pub fn personality(&self, kind: PersonalityKind, name: Option<&str>, subject: Option<&str>) -> Personality {
        let name = name.unwrap_or_else(|| self.default_name(kind));
        match kind {
            PersonalityKind::Base => Personality::base(name),
            PersonalityKind::Friendly => Personality::friendly(name),
            PersonalityKind::Teacher => match subject {
                Some(subject) => Personality::teacher(name, subject),
                None => Personality::new(kind, name),
            },
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let path = Self::expand_path(path);
            return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check CHATBOT_CONFIG env var
        if let Ok(env_path) = std::env::var("CHATBOT_CONFIG") {
            let path = Self::expand_path(Path::new(&env_path));
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from CHATBOT_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/chatbot/chatbot.yaml
        let path = Self::app_dir().join("chatbot.yaml");
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        // Try ./chatbot.yaml (for development)
        let local_config = PathBuf::from("chatbot.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Directory holding chatbot.yaml and the optional .env file
    pub fn app_dir() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("chatbot")
    }

    /// Where the log file lives, under the local data directory
    pub fn log_file() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("chatbot")
            .join("logs")
            .join("chatbot.log")
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
