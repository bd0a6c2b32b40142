use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::Content;
use super::schema::Schema;
use super::tool::{Tool, ToolConfig};

/// Safety threshold for one harm category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

/// Parameters controlling generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentConfig {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Top-k sampling; not available on the Responses API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<f32>,
    /// Maximum tokens to generate; zero means unset
    #[serde(default)]
    pub max_output_tokens: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
    /// Number of candidates to generate; zero or one means a single candidate
    #[serde(default)]
    pub candidate_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    /// Whether to return log probabilities
    #[serde(default)]
    pub response_logprobs: bool,
    /// Number of top log probabilities per token when `response_logprobs` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<u32>,
    /// Instructions given ahead of the conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Expected output MIME type (`text/plain` or `application/json`)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub response_mime_type: String,
    /// Structured output as a native schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
    /// Structured output as a raw JSON schema; takes precedence over `response_schema`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_json_schema: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_settings: Option<Vec<SafetySetting>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
    /// Tools available to the model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    /// Tool usage policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_config: Option<ToolConfig>,
}

/// Provider-agnostic generation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    /// Model override; the model's own name is used when empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model: String,
    /// Conversation contents
    #[serde(default)]
    pub contents: Vec<Content>,
    /// Generation settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GenerateContentConfig>,
}

impl LlmRequest {
    /// Request with the given contents and no config
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            model: String::new(),
            contents,
            config: None,
        }
    }

    /// Attach a generation config
    #[must_use]
    pub fn with_config(mut self, config: GenerateContentConfig) -> Self {
        self.config = Some(config);
        self
    }
}
