//! Configuration for the chat application.
//!
//! The configuration is read once at startup from the environment and then
//! passed by value into the session.  Nothing reads the environment after that.

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::transcript::MAX_HISTORY;

/// Model used when `MODEL_NAME` is unset.
pub const DEFAULT_MODEL: &str = "gemma3:1b-it-q4_K_M";

/// Server address used when `URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Environment variable naming the model.
pub const MODEL_ENV: &str = "MODEL_NAME";

/// Environment variable naming the server address.
pub const URL_ENV: &str = "URL";

/// Path of the chat endpoint relative to the server address.
const CHAT_PATH: &str = "api/chat";

/// Default connect/response/read timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// The model identifier sent with every request.
    pub model: String,

    /// Base address of the inference server.
    pub base_url: String,

    /// Maximum number of turns kept in the transcript.
    pub max_history: usize,

    /// Timeout for connecting, for the response headers, and between body reads.
    pub timeout: Duration,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemma3:1b-it-q4_K_M
    /// - Base URL: http://localhost:11434
    /// - Max history: 30 turns
    /// - Timeout: 30 seconds
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_history: MAX_HISTORY,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `MODEL_NAME` and `URL` from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    ///
    /// Unset or blank variables fall back to the defaults.  The resulting
    /// chat URL is validated here so a bad `URL` fails at startup rather than
    /// on the first message.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::new();
        if let Some(model) = non_blank(MODEL_ENV) {
            config.model = model;
        }
        if let Some(base_url) = non_blank(URL_ENV) {
            config.base_url = base_url;
        }
        config.chat_url()?;
        Ok(config)
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the server base address.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the transcript bound.
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history;
        self
    }

    /// Sets the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The chat endpoint: `<base_url>/api/chat`.
    pub fn chat_url(&self) -> Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        let url = Url::parse(&format!("{base}/{CHAT_PATH}"))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(Error::url(
                format!("unsupported scheme {scheme:?} in {URL_ENV}={}", self.base_url),
                None,
            )),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}
