//! Responses API stream events to canonical micro-responses

use std::collections::HashMap;

use tracing::trace;

use super::response::parse_arguments;
use crate::error::LlmError;
use crate::protocol::openai::{FunctionCallArgumentsDoneEvent, ResponseStreamEvent};
use crate::types::{FunctionCall, GenerateContentResponse, Part};

const GENERIC_STREAM_ERROR: &str = "stream reported an error without a message";

/// Stateful translator for one response stream
///
/// Text and reasoning deltas are forwarded immediately. Function call
/// arguments are buffered per output item until the matching
/// `response.function_call_arguments.done` event arrives.
#[derive(Debug, Default)]
pub struct StreamTranslator {
    arguments: HashMap<String, String>,
}

impl StreamTranslator {
    /// Create a translator with no buffered arguments
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate one event
    ///
    /// Returns `Ok(None)` for events that carry nothing to forward.
    ///
    /// # Errors
    ///
    /// Fails on `response.failed` and `error` events, and when completed
    /// function arguments are not a JSON object.
    pub fn process(&mut self, event: ResponseStreamEvent) -> Result<Option<GenerateContentResponse>, LlmError> {
        match event {
            ResponseStreamEvent::OutputTextDelta(delta) => Ok(non_empty(delta.delta).map(Part::text).map(single)),
            ResponseStreamEvent::ReasoningTextDelta(delta) | ResponseStreamEvent::ReasoningSummaryTextDelta(delta) => {
                Ok(non_empty(delta.delta).map(Part::thought).map(single))
            }
            ResponseStreamEvent::FunctionCallArgumentsDelta(delta) => {
                if !delta.delta.is_empty() {
                    self.arguments
                        .entry(delta.item_id)
                        .or_default()
                        .push_str(&delta.delta);
                }
                Ok(None)
            }
            ResponseStreamEvent::FunctionCallArgumentsDone(done) => self.finish_call(done).map(Some),
            ResponseStreamEvent::Failed(failed) => {
                let message = failed.response.error.map(|e| e.message).unwrap_or_default();
                Err(LlmError::ResponseFailed(message))
            }
            ResponseStreamEvent::Error(error) => {
                let message = non_empty(error.message).unwrap_or_else(|| GENERIC_STREAM_ERROR.to_owned());
                Err(LlmError::StreamError(message))
            }
            other => {
                trace!(event = ?other, "ignoring stream event");
                Ok(None)
            }
        }
    }

    /// Number of function calls with buffered but unfinished arguments
    pub fn buffered_calls(&self) -> usize {
        self.arguments.len()
    }

    fn finish_call(&mut self, done: FunctionCallArgumentsDoneEvent) -> Result<GenerateContentResponse, LlmError> {
        let buffered = self.arguments.remove(&done.item_id);
        let payload = non_empty(done.arguments)
            .or_else(|| buffered.and_then(non_empty))
            .unwrap_or_else(|| "{}".to_owned());

        let call = FunctionCall {
            id: Some(done.item_id),
            name: done.name,
            args: parse_arguments(&payload)?,
        };
        Ok(single(Part::FunctionCall(call)))
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn single(part: Part) -> GenerateContentResponse {
    GenerateContentResponse::single_part(part)
}
