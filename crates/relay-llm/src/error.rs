use thiserror::Error;

/// Broad class of an [`LlmError`]
///
/// Lets callers branch on capability mismatches without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or invalid input supplied by the caller
    Precondition,
    /// The canonical request uses a feature the vendor API cannot express
    CapabilityGap,
    /// Content could not be translated in either direction
    Protocol,
    /// A function response could not be matched to a pending call
    Correlation,
    /// Network failure or an error reported by the vendor
    Transport,
}

/// Errors produced while adapting requests and responses
#[derive(Debug, Error)]
pub enum LlmError {
    /// Model was constructed without a name
    #[error("model name is required")]
    ModelNameRequired,

    /// No API key was configured for the transport
    #[error("an API key is required to call the Responses API")]
    MissingCredentials,

    /// Request contents resolved to zero input items
    #[error("request has no contents to convert")]
    NoContents,

    /// A function call part has an empty name
    #[error("function call missing name")]
    FunctionCallMissingName,

    /// A function declaration has an empty name
    #[error("function declaration {index} in tool {tool} is missing a name")]
    FunctionDeclarationMissingName {
        /// Position of the tool in the request
        tool: usize,
        /// Position of the declaration within the tool
        index: usize,
    },

    /// A function response carries no call ID and nothing is pending
    #[error("response for function {name:?} has no call id and no call is pending")]
    FunctionResponseMissingCallId {
        /// Function name from the response part
        name: String,
    },

    #[error("top_k is not supported by the Responses API")]
    TopKNotSupported,

    #[error("stop sequences are not supported")]
    StopSequencesNotSupported,

    #[error("multiple candidates per request are not supported")]
    MultipleCandidatesNotSupported,

    #[error("frequency/presence penalties are not supported")]
    PenaltiesNotSupported,

    #[error("request labels are not supported")]
    LabelsNotSupported,

    #[error("safety settings are not supported")]
    SafetySettingsNotSupported,

    /// A tool declares a built-in capability instead of (or alongside) functions
    #[error("non-function tools are not supported (tool {index} declares {capability})")]
    NonFunctionTool {
        /// Position of the offending tool
        index: usize,
        /// First built-in capability found on the tool
        capability: &'static str,
    },

    /// A tool declares no functions at all
    #[error("tool {index} does not declare any functions")]
    ToolWithoutFunctions {
        /// Position of the offending tool
        index: usize,
    },

    #[error("unsupported tool calling mode {0:?}")]
    UnsupportedToolMode(String),

    #[error("response mime type {0:?} is not supported")]
    UnsupportedMimeType(String),

    #[error("json response requested without schema")]
    JsonResponseWithoutSchema,

    #[error("empty json schema")]
    EmptyJsonSchema,

    /// Schema did not normalize into a JSON object
    #[error("schema must be a JSON object, got {0}")]
    InvalidSchema(&'static str),

    /// Function call arguments were not a JSON object
    #[error("failed to parse function call arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    /// A value could not be encoded as JSON
    #[error("failed to serialize {what}: {source}")]
    Serialization {
        /// What was being serialized
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Content part kind that has no Responses API input equivalent
    #[error("unsupported content part: {0}")]
    UnsupportedPart(&'static str),

    #[error("unsupported role {0:?}")]
    UnsupportedRole(String),

    #[error("system instruction contains a non-text part: {0}")]
    NonTextSystemInstruction(&'static str),

    #[error("unsupported output item type {0:?}")]
    UnsupportedOutputItem(String),

    #[error("unsupported message content type {0:?}")]
    UnsupportedMessageContent(String),

    /// Vendor returned a null body
    #[error("empty response")]
    EmptyResponse,

    /// Response body was not a valid response object
    #[error("failed to decode response body: {0}")]
    InvalidResponse(#[source] serde_json::Error),

    #[error("response included no output items")]
    NoOutputItems,

    #[error("response output did not contain text or tool content")]
    NoTextOrToolContent,

    /// A stream event payload could not be decoded
    #[error("malformed stream event: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    /// Function response references a call ID that is not pending
    #[error("received function response for unknown or already completed call id {0:?}")]
    UnknownCallId(String),

    /// HTTP transport failure
    #[error("call failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Vendor returned a non-success status
    #[error("provider returned {status}: {message}")]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Error message from the vendor body, or the raw body
        message: String,
    },

    /// Vendor reported `response.failed` during a stream
    #[error("response failed: {0}")]
    ResponseFailed(String),

    /// Vendor emitted an `error` event during a stream
    #[error("stream error: {0}")]
    StreamError(String),

    /// Streaming was requested but the vendor did not answer with an event stream
    #[error("streaming unavailable")]
    StreamingUnavailable,
}

impl LlmError {
    /// Classify this error
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ModelNameRequired
            | Self::MissingCredentials
            | Self::NoContents
            | Self::FunctionCallMissingName
            | Self::FunctionDeclarationMissingName { .. }
            | Self::FunctionResponseMissingCallId { .. } => ErrorCategory::Precondition,
            Self::TopKNotSupported
            | Self::StopSequencesNotSupported
            | Self::MultipleCandidatesNotSupported
            | Self::PenaltiesNotSupported
            | Self::LabelsNotSupported
            | Self::SafetySettingsNotSupported
            | Self::NonFunctionTool { .. }
            | Self::ToolWithoutFunctions { .. }
            | Self::UnsupportedToolMode(_)
            | Self::UnsupportedMimeType(_)
            | Self::JsonResponseWithoutSchema
            | Self::EmptyJsonSchema => ErrorCategory::CapabilityGap,
            Self::InvalidSchema(_)
            | Self::InvalidArguments(_)
            | Self::Serialization { .. }
            | Self::UnsupportedPart(_)
            | Self::UnsupportedRole(_)
            | Self::NonTextSystemInstruction(_)
            | Self::UnsupportedOutputItem(_)
            | Self::UnsupportedMessageContent(_)
            | Self::EmptyResponse
            | Self::InvalidResponse(_)
            | Self::NoOutputItems
            | Self::NoTextOrToolContent
            | Self::MalformedEvent(_) => ErrorCategory::Protocol,
            Self::UnknownCallId(_) => ErrorCategory::Correlation,
            Self::Transport(_)
            | Self::Upstream { .. }
            | Self::ResponseFailed(_)
            | Self::StreamError(_)
            | Self::StreamingUnavailable => ErrorCategory::Transport,
        }
    }

    /// Whether the request asked for something the vendor cannot do
    pub const fn is_capability_gap(&self) -> bool {
        matches!(self.category(), ErrorCategory::CapabilityGap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_features_are_capability_gaps() {
        assert!(LlmError::TopKNotSupported.is_capability_gap());
        assert!(LlmError::NonFunctionTool { index: 0, capability: "retrieval" }.is_capability_gap());
        assert!(LlmError::JsonResponseWithoutSchema.is_capability_gap());
    }

    #[test]
    fn correlation_and_transport_are_distinct() {
        assert_eq!(LlmError::UnknownCallId("x".into()).category(), ErrorCategory::Correlation);
        assert_eq!(LlmError::StreamingUnavailable.category(), ErrorCategory::Transport);
        assert!(!LlmError::NoContents.is_capability_gap());
    }

    #[test]
    fn non_function_tool_names_position() {
        let err = LlmError::NonFunctionTool {
            index: 2,
            capability: "code_execution",
        };
        assert!(err.to_string().contains("tool 2"));
    }
}
