//! `OpenAI` Responses API wire format types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// -- Request types --

/// `POST /responses` request body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsesRequest {
    /// Model identifier
    pub model: String,
    /// Ordered input items
    pub input: Vec<InputItem>,
    /// System/developer instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Maximum output tokens, including reasoning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Number of most likely tokens to return log probabilities for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<u32>,
    /// Tool definitions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<FunctionTool>,
    /// Tool choice configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    /// Output text format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextConfig>,
    /// Whether to stream the response as server-sent events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// One item of the request input list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputItem {
    /// Role-tagged message
    Message {
        /// Message role
        role: InputRole,
        /// Content entries
        content: Vec<InputContent>,
    },
    /// Function call previously made by the model
    FunctionCall {
        /// Correlation ID
        call_id: String,
        /// Function name
        name: String,
        /// JSON-encoded arguments
        arguments: String,
    },
    /// Output of a function call
    FunctionCallOutput {
        /// ID of the call being answered
        call_id: String,
        /// JSON-encoded result
        output: String,
    },
}

/// Role of an input message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputRole {
    User,
    Assistant,
    System,
    Developer,
}

/// Content entry within an input message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    /// Text input
    InputText {
        /// The text string
        text: String,
    },
}

/// Function tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionTool {
    /// Tool type (always "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for parameters
    pub parameters: Map<String, Value>,
    /// Enforce strict schema adherence
    #[serde(default)]
    pub strict: bool,
}

/// Tool choice: a simple mode or an allow-list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoice {
    /// "none", "auto" or "required"
    Mode(ToolChoiceMode),
    /// Restrict the model to a subset of the declared tools
    Allowed(AllowedTools),
}

/// Simple tool selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoiceMode {
    None,
    Auto,
    Required,
}

/// `allowed_tools` tool choice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedTools {
    /// Choice type (always "`allowed_tools`")
    #[serde(rename = "type")]
    pub choice_type: String,
    /// Whether calling one of the tools is optional or required
    pub mode: AllowedToolsMode,
    /// Tools the model may call
    pub tools: Vec<ToolReference>,
}

/// Mode of an `allowed_tools` choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllowedToolsMode {
    Auto,
    Required,
}

/// Reference to a declared tool by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReference {
    /// Tool type (always "function")
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function name
    pub name: String,
}

/// Text output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConfig {
    /// Output format
    pub format: TextFormat,
}

/// Output text format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextFormat {
    /// Free-form text
    Text,
    /// Structured output constrained by a JSON schema
    JsonSchema {
        /// Format name
        name: String,
        /// JSON schema
        schema: Map<String, Value>,
        /// Enforce strict schema adherence
        #[serde(default, skip_serializing_if = "Option::is_none")]
        strict: Option<bool>,
    },
}

// -- Response types --

/// Response object returned by `POST /responses` and embedded in lifecycle events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseObject {
    /// Response identifier
    #[serde(default)]
    pub id: String,
    /// Model used
    #[serde(default)]
    pub model: String,
    /// Response status (e.g. "completed", "incomplete", "failed")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Output items in generation order
    #[serde(default)]
    pub output: Vec<OutputItem>,
    /// Token usage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ResponseUsage>,
    /// Why the response is incomplete
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incomplete_details: Option<IncompleteDetails>,
    /// Error details for failed responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

impl ResponseObject {
    /// Incomplete reason, empty when the response completed
    pub fn incomplete_reason(&self) -> &str {
        self.incomplete_details.as_ref().map_or("", |d| d.reason.as_str())
    }
}

/// One output item
///
/// Kept as a flat union keyed by `type` so that unknown item types survive
/// deserialization and can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputItem {
    /// Item type ("message", "`function_call`", "reasoning", ...)
    #[serde(rename = "type")]
    pub item_type: String,
    /// Item identifier
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Message role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Message or reasoning content entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<OutputContent>,
    /// Reasoning summary entries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub summary: Vec<OutputContent>,
    /// Function name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Function call correlation ID
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub call_id: String,
    /// JSON-encoded function arguments
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub arguments: String,
}

/// Content entry of a message, reasoning content, or reasoning summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputContent {
    /// Entry type ("`output_text`", "refusal", "`reasoning_text`", "`summary_text`")
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text for text-like entries
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Refusal explanation
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub refusal: String,
}

/// Token usage in a response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub input_tokens_details: InputTokensDetails,
    #[serde(default)]
    pub output_tokens: u32,
    #[serde(default)]
    pub output_tokens_details: OutputTokensDetails,
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokensDetails {
    #[serde(default)]
    pub cached_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTokensDetails {
    #[serde(default)]
    pub reasoning_tokens: u32,
}

/// Why a response stopped before completing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteDetails {
    #[serde(default)]
    pub reason: String,
}

/// Error attached to a failed response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

// -- Streaming types --

/// Server-sent event emitted while streaming a response
///
/// Event kinds this adapter does not know deserialize to [`ResponseStreamEvent::Unknown`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseStreamEvent {
    #[serde(rename = "response.output_text.delta")]
    OutputTextDelta(TextDeltaEvent),
    #[serde(rename = "response.output_text.done")]
    OutputTextDone(TextDoneEvent),
    #[serde(rename = "response.reasoning_text.delta")]
    ReasoningTextDelta(TextDeltaEvent),
    #[serde(rename = "response.reasoning_text.done")]
    ReasoningTextDone(TextDoneEvent),
    #[serde(rename = "response.reasoning_summary_text.delta")]
    ReasoningSummaryTextDelta(TextDeltaEvent),
    #[serde(rename = "response.reasoning_summary_text.done")]
    ReasoningSummaryTextDone(TextDoneEvent),
    #[serde(rename = "response.function_call_arguments.delta")]
    FunctionCallArgumentsDelta(FunctionCallArgumentsDeltaEvent),
    #[serde(rename = "response.function_call_arguments.done")]
    FunctionCallArgumentsDone(FunctionCallArgumentsDoneEvent),
    #[serde(rename = "response.created")]
    Created(ResponseLifecycleEvent),
    #[serde(rename = "response.in_progress")]
    InProgress(ResponseLifecycleEvent),
    #[serde(rename = "response.completed")]
    Completed(ResponseLifecycleEvent),
    #[serde(rename = "response.failed")]
    Failed(ResponseLifecycleEvent),
    #[serde(rename = "response.output_item.added")]
    OutputItemAdded(OutputItemEvent),
    #[serde(rename = "response.output_item.done")]
    OutputItemDone(OutputItemEvent),
    #[serde(rename = "error")]
    Error(ErrorEvent),
    /// Any event kind not listed above
    #[serde(other)]
    Unknown,
}

/// Incremental text for an output text, reasoning, or reasoning summary entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDeltaEvent {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub output_index: u32,
    #[serde(default)]
    pub delta: String,
}

/// Final text of an output text, reasoning, or reasoning summary entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDoneEvent {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub output_index: u32,
    #[serde(default)]
    pub text: String,
}

/// Fragment of function call arguments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallArgumentsDeltaEvent {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub output_index: u32,
    #[serde(default)]
    pub delta: String,
}

/// Function call arguments are complete
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallArgumentsDoneEvent {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub output_index: u32,
    #[serde(default)]
    pub name: String,
    /// Complete JSON-encoded arguments; may be empty
    #[serde(default)]
    pub arguments: String,
}

/// Event carrying a snapshot of the response object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseLifecycleEvent {
    #[serde(default)]
    pub response: ResponseObject,
}

/// Output item added or finished
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputItemEvent {
    #[serde(default)]
    pub output_index: u32,
    #[serde(default)]
    pub item: OutputItem,
}

/// Stream-level error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

// -- Error response --

/// Error response body for non-success statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiErrorResponse {
    /// Error details
    pub error: OpenAiErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiErrorDetail {
    /// Error message
    pub message: String,
    /// Error type
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Parameter that caused the error
    #[serde(default)]
    pub param: Option<String>,
    /// Error code
    #[serde(default)]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_stream_events_deserialize() {
        let event: ResponseStreamEvent =
            serde_json::from_str(r#"{"type":"response.web_search_call.searching","item_id":"ws_1"}"#).unwrap();
        assert_eq!(event, ResponseStreamEvent::Unknown);
    }

    #[test]
    fn function_call_done_event_deserializes() {
        let event: ResponseStreamEvent = serde_json::from_str(
            r#"{"type":"response.function_call_arguments.done","item_id":"fc_1","name":"lookup","arguments":"{}","sequence_number":7}"#,
        )
        .unwrap();
        let ResponseStreamEvent::FunctionCallArgumentsDone(done) = event else {
            panic!("expected arguments done, got {event:?}");
        };
        assert_eq!(done.item_id, "fc_1");
        assert_eq!(done.name, "lookup");
    }

    #[test]
    fn allowed_tools_choice_serializes() {
        let choice = ToolChoice::Allowed(AllowedTools {
            choice_type: "allowed_tools".to_owned(),
            mode: AllowedToolsMode::Required,
            tools: vec![ToolReference {
                tool_type: "function".to_owned(),
                name: "lookup".to_owned(),
            }],
        });
        assert_eq!(
            serde_json::to_value(&choice).unwrap(),
            serde_json::json!({
                "type": "allowed_tools",
                "mode": "required",
                "tools": [{"type": "function", "name": "lookup"}]
            })
        );
        assert_eq!(
            serde_json::to_value(ToolChoice::Mode(ToolChoiceMode::Required)).unwrap(),
            serde_json::json!("required")
        );
    }

    #[test]
    fn input_items_are_tagged_by_type() {
        let item = InputItem::FunctionCallOutput {
            call_id: "call_1".to_owned(),
            output: "{}".to_owned(),
        };
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            serde_json::json!({"type": "function_call_output", "call_id": "call_1", "output": "{}"})
        );
    }
}
