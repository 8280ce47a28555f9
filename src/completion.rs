//! Completion service
//!
//! The chatbot treats text generation as a black box: a prompt goes in, a
//! completion comes out or the call fails. [`GroqClient`] is the production
//! implementation talking to an OpenAI-compatible chat completions endpoint.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::config::{CompletionConfig, Config};

/// Why a completion could not be produced
#[derive(Debug, Error)]
pub enum CompletionFailure {
    #[error("API key not found: set {env_var} or add it to {env_file}")]
    MissingApiKey { env_var: String, env_file: String },

    #[error("Failed to serialize completion request: {0}")]
    Request(#[from] serde_json::Error),

    #[error("Failed to reach completion service: {0}")]
    Transport(#[from] ureq::Error),

    #[error("Completion service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    Malformed(String),
}

/// Anything that can turn a prompt into generated text
pub trait CompletionService {
    fn complete(&self, prompt: &str, model: &str) -> Result<String, CompletionFailure>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Blocking client for the Groq chat completions API
pub struct GroqClient {
    agent: ureq::Agent,
    endpoint: String,
    api_key: String,
}

impl GroqClient {
    /// Build a client from config, resolving the API key up front
    pub fn from_config(config: &CompletionConfig) -> Result<Self, CompletionFailure> {
        let env_file = Config::app_dir().join(".env");
        let api_key = resolve_api_key(&config.api_key_env, &env_file)?;
        Ok(Self::new(&config.endpoint, api_key, config.timeout_secs))
    }

    pub fn new(endpoint: &str, api_key: String, timeout_secs: u64) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            endpoint: endpoint.to_string(),
            api_key,
        }
    }
}

impl CompletionService for GroqClient {
    fn complete(&self, prompt: &str, model: &str) -> Result<String, CompletionFailure> {
        log::info!("Requesting completion from {} with model={}", self.endpoint, model);

        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };
        let request_body = serde_json::to_string(&request)?;

        let mut response = self
            .agent
            .post(&self.endpoint)
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .send(request_body.as_bytes())?;

        let status = response.status().as_u16();
        let response_body = response.body_mut().read_to_string()?;
        log::debug!("Completion service answered HTTP {} ({} bytes)", status, response_body.len());

        if !(200..300).contains(&status) {
            return Err(CompletionFailure::Status {
                status,
                body: response_body,
            });
        }

        parse_reply(&response_body)
    }
}

/// Pull the first choice's text out of a chat completions response
fn parse_reply(body: &str) -> Result<String, CompletionFailure> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| CompletionFailure::Malformed(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| CompletionFailure::Malformed("no message content in first choice".to_string()))
}

/// Look up the API key in the environment, then in a `KEY=value` env file
pub fn resolve_api_key(env_var: &str, env_file: &Path) -> Result<String, CompletionFailure> {
    if let Ok(key) = std::env::var(env_var)
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    if let Ok(content) = fs::read_to_string(env_file) {
        for line in content.lines() {
            if let Some((key, value)) = line.split_once('=')
                && key.trim().trim_start_matches("export ").trim() == env_var
            {
                let value = value.trim().trim_matches('"');
                if !value.is_empty() {
                    log::debug!("Using {} from {}", env_var, env_file.display());
                    return Ok(value.to_string());
                }
            }
        }
    }

    Err(CompletionFailure::MissingApiKey {
        env_var: env_var.to_string(),
        env_file: env_file.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_reply() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hello there!"}}]}"#;
        assert_eq!(parse_reply(body).unwrap(), "Hello there!");
    }

    #[test]
    fn test_parse_reply_no_choices() {
        let err = parse_reply(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, CompletionFailure::Malformed(_)));
    }

    #[test]
    fn test_parse_reply_not_json() {
        let err = parse_reply("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, CompletionFailure::Malformed(_)));
    }

    #[test]
    fn test_request_body_shape() {
        let request = ChatRequest {
            model: "llama-3.3-70b-versatile",
            messages: vec![ChatMessage {
                role: "user",
                content: "User: hi\nBot:",
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "User: hi\nBot:");
    }

    #[test]
    fn test_resolve_api_key_from_env_file() {
        let temp = TempDir::new().unwrap();
        let env_file = temp.path().join(".env");
        fs::write(&env_file, "OTHER=1\nexport CHATBOT_TEST_KEY_FILE=\"secret-value\"\n").unwrap();

        let key = resolve_api_key("CHATBOT_TEST_KEY_FILE", &env_file).unwrap();
        assert_eq!(key, "secret-value");
    }

    #[test]
    fn test_resolve_api_key_from_env() {
        // SAFETY: Test runs single-threaded, env var is test-specific
        unsafe {
            std::env::set_var("CHATBOT_TEST_KEY_ENV", "from-env");
        }
        let key = resolve_api_key("CHATBOT_TEST_KEY_ENV", Path::new("/nonexistent/.env")).unwrap();
        assert_eq!(key, "from-env");
        unsafe {
            std::env::remove_var("CHATBOT_TEST_KEY_ENV");
        }
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let err = resolve_api_key("CHATBOT_TEST_KEY_MISSING", Path::new("/nonexistent/.env")).unwrap_err();
        assert!(matches!(err, CompletionFailure::MissingApiKey { .. }));
        assert!(err.to_string().contains("CHATBOT_TEST_KEY_MISSING"));
    }
}
