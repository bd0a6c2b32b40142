//! Responses API response to canonical response conversion

use serde_json::{Map, Value};

use crate::error::LlmError;
use crate::protocol::openai::{OutputItem, ResponseObject, ResponseUsage};
use crate::types::{
    Candidate, Content, FinishReason, FunctionCall, GenerateContentResponse, MediaModality, ModalityTokenCount, Part,
    PromptFeedback, ROLE_MODEL, UsageMetadata,
};

/// Convert a completed response into a canonical response with one candidate
///
/// # Errors
///
/// Fails when the response has no output, contains item or content types
/// with no canonical equivalent, or carries malformed function arguments.
pub fn convert_response(resp: &ResponseObject) -> Result<GenerateContentResponse, LlmError> {
    let parts = convert_output_items(&resp.output)?;

    Ok(GenerateContentResponse {
        candidates: vec![Candidate {
            content: Content::new(ROLE_MODEL, parts),
            finish_reason: finish_reason(resp.incomplete_reason()),
        }],
        response_id: resp.id.clone(),
        model_version: resp.model.clone(),
        usage_metadata: Some(convert_usage(resp.usage.as_ref())),
        prompt_feedback: prompt_feedback(resp.incomplete_reason()),
    })
}

fn convert_output_items(items: &[OutputItem]) -> Result<Vec<Part>, LlmError> {
    if items.is_empty() {
        return Err(LlmError::NoOutputItems);
    }

    let mut parts = Vec::new();
    for item in items {
        match item.item_type.as_str() {
            "message" => {
                for content in &item.content {
                    match content.content_type.as_str() {
                        "output_text" => {
                            if !content.text.is_empty() {
                                parts.push(Part::text(content.text.clone()));
                            }
                        }
                        "refusal" => parts.push(Part::text(content.refusal.clone())),
                        other => return Err(LlmError::UnsupportedMessageContent(other.to_owned())),
                    }
                }
            }
            "function_call" => parts.push(Part::FunctionCall(FunctionCall {
                id: Some(item.call_id.clone()),
                name: item.name.clone(),
                args: parse_arguments(&item.arguments)?,
            })),
            "reasoning" => {
                parts.extend(
                    item.content
                        .iter()
                        .chain(&item.summary)
                        .filter(|entry| !entry.text.is_empty())
                        .map(|entry| Part::thought(entry.text.clone())),
                );
            }
            other => return Err(LlmError::UnsupportedOutputItem(other.to_owned())),
        }
    }

    if parts.is_empty() {
        return Err(LlmError::NoTextOrToolContent);
    }
    Ok(parts)
}

/// Parse JSON-encoded function arguments into an object
///
/// An empty payload yields an empty object.
///
/// # Errors
///
/// Returns [`LlmError::InvalidArguments`] when the payload is not a JSON object.
pub fn parse_arguments(raw: &str) -> Result<Map<String, Value>, LlmError> {
    if raw.is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(raw).map_err(LlmError::InvalidArguments)
}

/// Map an incomplete reason onto a finish reason
pub fn finish_reason(reason: &str) -> FinishReason {
    match reason {
        "" => FinishReason::Stop,
        "max_output_tokens" => FinishReason::MaxTokens,
        "content_filter" => FinishReason::Safety,
        _ => FinishReason::Other,
    }
}

fn convert_usage(usage: Option<&ResponseUsage>) -> UsageMetadata {
    let usage = usage.cloned().unwrap_or_default();

    UsageMetadata {
        prompt_token_count: usage.input_tokens,
        candidates_token_count: usage.output_tokens,
        total_token_count: usage.total_tokens,
        cached_content_token_count: usage.input_tokens_details.cached_tokens,
        thoughts_token_count: usage.output_tokens_details.reasoning_tokens,
        prompt_tokens_details: vec![ModalityTokenCount {
            modality: MediaModality::Text,
            token_count: usage.input_tokens,
        }],
        candidates_tokens_details: vec![ModalityTokenCount {
            modality: MediaModality::Text,
            token_count: usage.output_tokens,
        }],
    }
}

fn prompt_feedback(reason: &str) -> Option<PromptFeedback> {
    (!reason.is_empty()).then(|| PromptFeedback {
        block_reason: reason.to_owned(),
        block_reason_message: reason.to_owned(),
    })
}
