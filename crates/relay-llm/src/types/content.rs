use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of end-user turns
pub const ROLE_USER: &str = "user";
/// Role of model turns
pub const ROLE_MODEL: &str = "model";
/// Role of system turns
pub const ROLE_SYSTEM: &str = "system";
/// Role of developer turns
pub const ROLE_DEVELOPER: &str = "developer";

/// A role-tagged block of ordered parts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// Author role (`user`, `model`, `system` or `developer`); empty means user
    #[serde(default)]
    pub role: String,
    /// Ordered content parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a content block from parts
    pub fn new(role: impl Into<String>, parts: Vec<Part>) -> Self {
        Self {
            role: role.into(),
            parts,
        }
    }

    /// Create a single-part text block
    pub fn from_text(text: impl Into<String>, role: impl Into<String>) -> Self {
        Self::new(role, vec![Part::text(text)])
    }

    /// Concatenate the non-thought text parts
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text, thought: false } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// One atomic unit of content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    /// Text, optionally flagged as model reasoning
    Text {
        /// The text string
        text: String,
        /// Whether this is reasoning rather than user-facing output
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        thought: bool,
    },
    /// Function invocation requested by the model
    FunctionCall(FunctionCall),
    /// Result of a function invocation
    FunctionResponse(FunctionResponse),
    /// Inline binary payload
    InlineData(Blob),
    /// Reference to a stored file
    FileData(FileData),
    /// Code produced for a code-execution tool
    ExecutableCode(ExecutableCode),
    /// Outcome of a code-execution tool run
    CodeExecutionResult(CodeExecutionResult),
}

impl Part {
    /// Plain text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            thought: false,
        }
    }

    /// Reasoning text part
    pub fn thought(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            thought: true,
        }
    }

    /// Short name of the part kind, used in error messages
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::FunctionCall(_) => "function_call",
            Self::FunctionResponse(_) => "function_response",
            Self::InlineData(_) => "inline_data",
            Self::FileData(_) => "file_data",
            Self::ExecutableCode(_) => "executable_code",
            Self::CodeExecutionResult(_) => "code_execution_result",
        }
    }

    /// Text of a text or thought part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Function call payload, if this is a function call part
    pub const fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            Self::FunctionCall(call) => Some(call),
            _ => None,
        }
    }
}

/// Function invocation with JSON object arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Correlation ID; generated on the way out when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name
    pub name: String,
    /// Argument object
    #[serde(default)]
    pub args: Map<String, Value>,
}

impl FunctionCall {
    /// Create a call without an explicit ID
    pub fn new(name: impl Into<String>, args: Map<String, Value>) -> Self {
        Self {
            id: None,
            name: name.into(),
            args,
        }
    }

    /// Create a call with no arguments
    pub fn without_args(name: impl Into<String>) -> Self {
        Self::new(name, Map::new())
    }
}

/// Result of a function invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    /// ID of the call being answered; matched to the oldest pending call when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name
    pub name: String,
    /// Result object
    #[serde(default)]
    pub response: Map<String, Value>,
}

impl FunctionResponse {
    /// Create a response without an explicit call ID
    pub fn new(name: impl Into<String>, response: Map<String, Value>) -> Self {
        Self {
            id: None,
            name: name.into(),
            response,
        }
    }
}

/// Inline bytes with a MIME type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blob {
    pub mime_type: String,
    /// Base64-encoded payload
    pub data: String,
}

/// URI reference to stored data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileData {
    pub mime_type: String,
    pub file_uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutableCode {
    pub language: String,
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeExecutionResult {
    pub outcome: String,
    #[serde(default)]
    pub output: String,
}
