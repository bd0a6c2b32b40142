use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::{Content, Part, ROLE_MODEL};

/// Reason the model stopped generating
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Not reported (streaming micro-responses)
    #[default]
    #[serde(rename = "FINISH_REASON_UNSPECIFIED")]
    Unspecified,
    /// Natural end of generation
    Stop,
    /// Hit the output token limit
    MaxTokens,
    /// Content was filtered
    Safety,
    /// Any other reason
    Other,
}

/// Token accounting modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaModality {
    Text,
    Image,
    Audio,
    Video,
}

/// Tokens attributed to one modality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalityTokenCount {
    pub modality: MediaModality,
    pub token_count: u32,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    /// Tokens in the prompt
    pub prompt_token_count: u32,
    /// Tokens across generated candidates
    pub candidates_token_count: u32,
    /// Prompt plus candidates
    pub total_token_count: u32,
    /// Prompt tokens served from cache
    #[serde(default)]
    pub cached_content_token_count: u32,
    /// Tokens spent on reasoning
    #[serde(default)]
    pub thoughts_token_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prompt_tokens_details: Vec<ModalityTokenCount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates_tokens_details: Vec<ModalityTokenCount>,
}

/// Why the prompt was blocked or cut short
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptFeedback {
    pub block_reason: String,
    pub block_reason_message: String,
}

/// A single generated candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub content: Content,
    #[serde(default)]
    pub finish_reason: FinishReason,
}

/// Provider-agnostic generation response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateContentResponse {
    pub candidates: Vec<Candidate>,
    /// Vendor response identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub response_id: String,
    /// Model that produced the response
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Response with one model candidate holding one part
    pub fn single_part(part: Part) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Content::new(ROLE_MODEL, vec![part]),
                finish_reason: FinishReason::Unspecified,
            }],
            ..Self::default()
        }
    }

    /// First part of the first candidate
    pub fn first_part(&self) -> Option<&Part> {
        self.candidates.first().and_then(|c| c.content.parts.first())
    }
}

/// Application-level response handed back to the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// Whether more content for the same turn will follow
    #[serde(default)]
    pub partial: bool,
    /// Whether the model finished its turn
    #[serde(default)]
    pub turn_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub model_version: String,
    /// Block reason when no candidate was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Vendor-specific metadata (e.g. `openai_response_id`)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_metadata: HashMap<String, Value>,
}

impl From<GenerateContentResponse> for LlmResponse {
    fn from(resp: GenerateContentResponse) -> Self {
        let mut out = Self {
            usage_metadata: resp.usage_metadata,
            model_version: resp.model_version,
            ..Self::default()
        };

        if let Some(candidate) = resp.candidates.into_iter().next() {
            out.content = Some(candidate.content);
            out.finish_reason = Some(candidate.finish_reason);
        } else if let Some(feedback) = resp.prompt_feedback {
            out.error_code = Some(feedback.block_reason);
            out.error_message = Some(feedback.block_reason_message);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn llm_response_takes_first_candidate() {
        let resp = GenerateContentResponse {
            model_version: "gpt-test".into(),
            ..GenerateContentResponse::single_part(Part::text("hi"))
        };
        let llm: LlmResponse = resp.into();
        assert_eq!(llm.content.unwrap().text(), "hi");
        assert_eq!(llm.finish_reason, Some(FinishReason::Unspecified));
        assert_eq!(llm.model_version, "gpt-test");
        assert!(llm.error_code.is_none());
    }

    #[test]
    fn llm_response_surfaces_block_reason_without_candidates() {
        let resp = GenerateContentResponse {
            prompt_feedback: Some(PromptFeedback {
                block_reason: "content_filter".into(),
                block_reason_message: "content_filter".into(),
            }),
            ..GenerateContentResponse::default()
        };
        let llm: LlmResponse = resp.into();
        assert!(llm.content.is_none());
        assert_eq!(llm.error_code.as_deref(), Some("content_filter"));
    }
}
