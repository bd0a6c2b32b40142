use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default `OpenAI` API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for the Responses API
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Model used when a request does not name one
    pub model: String,
    /// API key for bearer authentication
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Base URL override (defaults to [`DEFAULT_BASE_URL`])
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Request timeout (e.g. "30s", "2m")
    #[serde(default = "default_timeout", deserialize_with = "duration_str::deserialize_duration")]
    pub timeout: Duration,
    /// Value for the `OpenAI-Organization` header
    #[serde(default)]
    pub organization: Option<String>,
    /// Value for the `OpenAI-Project` header
    #[serde(default)]
    pub project: Option<String>,
}

impl OpenAiConfig {
    /// Config for `model` with every other setting at its default
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            organization: None,
            project: None,
        }
    }

    /// Set the API key
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }
}

const fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}
