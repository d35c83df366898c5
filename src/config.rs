//! Client configuration.
//!
//! Built from defaults, then the `STREAMCHAT_*` environment variables, then
//! any builder overrides.

use std::fmt;

use crate::traits::Headers;

/// Default chat-completions endpoint (a local OpenAI-compatible server).
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/v1/chat/completions";

pub const ENV_ENDPOINT: &str = "STREAMCHAT_ENDPOINT";
pub const ENV_API_KEY: &str = "STREAMCHAT_API_KEY";
pub const ENV_MODEL: &str = "STREAMCHAT_MODEL";

/// Where and how to send chat requests.
///
/// # Example
///
/// ```ignore
/// use streamchat::config::ChatConfig;
///
/// let config = ChatConfig::from_env()
///     .with_model("gpt-4o-mini")
///     .with_api_key("sk-...");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Full URL of the chat-completions endpoint
    pub endpoint: String,
    /// Bearer token, omitted from requests when unset
    pub api_key: Option<String>,
    /// Model name, omitted from the request body when unset
    pub model: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            model: None,
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Defaults overridden by `STREAMCHAT_ENDPOINT`, `STREAMCHAT_API_KEY` and
    /// `STREAMCHAT_MODEL`. Empty values are treated as unset.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(endpoint) = env_var(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        config.api_key = env_var(ENV_API_KEY);
        config.model = env_var(ENV_MODEL);
        config
    }

    /// Headers sent with every chat request.
    pub fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        if let Some(key) = &self.api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        headers
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
