//! Canonical LLM adapter for the `OpenAI` Responses API
//!
//! Translates provider-agnostic requests into Responses API requests and
//! translates completed responses and server-sent event streams back into
//! canonical responses, keeping function calls correlated with their results.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod aggregator;
pub mod convert;
pub mod error;
pub mod protocol;
pub mod provider;
pub mod types;

pub use aggregator::{ResponseAggregator, StreamingAggregator};
pub use error::{ErrorCategory, LlmError};
pub use provider::openai::{OpenAiModel, translate_stream};
pub use provider::{Llm, LlmResponseStream};
pub use types::{GenerateContentResponse, LlmRequest, LlmResponse};
