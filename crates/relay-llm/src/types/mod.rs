//! Canonical, provider-agnostic request/response types
//!
//! Applications build requests and read responses in these types; the
//! `convert` module maps them to and from the Responses API wire format.

pub mod content;
pub mod request;
pub mod response;
pub mod schema;
pub mod tool;

pub use content::{
    Blob, CodeExecutionResult, Content, ExecutableCode, FileData, FunctionCall, FunctionResponse, Part,
    ROLE_DEVELOPER, ROLE_MODEL, ROLE_SYSTEM, ROLE_USER,
};
pub use request::{GenerateContentConfig, LlmRequest, SafetySetting};
pub use response::{
    Candidate, FinishReason, GenerateContentResponse, LlmResponse, MediaModality, ModalityTokenCount,
    PromptFeedback, UsageMetadata,
};
pub use schema::{Schema, SchemaType};
pub use tool::{FunctionCallingConfig, FunctionCallingMode, FunctionDeclaration, Tool, ToolConfig};
