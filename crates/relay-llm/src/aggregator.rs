//! Aggregation of streamed micro-responses into application responses

use crate::types::{Content, GenerateContentResponse, LlmResponse, Part, ROLE_MODEL, UsageMetadata};

/// Turns streamed micro-responses into the responses handed to the caller
pub trait ResponseAggregator: Send {
    /// Process one micro-response and return the responses to yield, in order
    fn process(&mut self, response: GenerateContentResponse) -> Vec<LlmResponse>;

    /// Flush buffered state once the stream is exhausted
    fn close(&mut self) -> Option<LlmResponse>;
}

/// Default aggregator
///
/// Text is forwarded as partial responses while being accumulated; the
/// accumulated text is emitted once as a complete response before any
/// non-text response and when the stream closes.
#[derive(Debug, Default)]
pub struct StreamingAggregator {
    text: String,
    thought: String,
    usage: Option<UsageMetadata>,
    model_version: String,
}

impl StreamingAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self::default()
    }

    fn take_aggregate(&mut self) -> Option<LlmResponse> {
        if self.text.is_empty() && self.thought.is_empty() {
            return None;
        }

        let mut parts = Vec::with_capacity(2);
        if !self.thought.is_empty() {
            parts.push(Part::thought(std::mem::take(&mut self.thought)));
        }
        if !self.text.is_empty() {
            parts.push(Part::text(std::mem::take(&mut self.text)));
        }

        Some(LlmResponse {
            content: Some(Content::new(ROLE_MODEL, parts)),
            usage_metadata: self.usage.take(),
            model_version: self.model_version.clone(),
            ..LlmResponse::default()
        })
    }
}

impl ResponseAggregator for StreamingAggregator {
    fn process(&mut self, response: GenerateContentResponse) -> Vec<LlmResponse> {
        if !response.model_version.is_empty() {
            self.model_version.clone_from(&response.model_version);
        }
        if response.usage_metadata.is_some() {
            self.usage.clone_from(&response.usage_metadata);
        }

        let parts = response.candidates.first().map_or(&[][..], |c| c.content.parts.as_slice());
        let is_text = !parts.is_empty() && parts.iter().all(|part| matches!(part, Part::Text { .. }));

        if is_text {
            for part in parts {
                if let Part::Text { text, thought } = part {
                    if *thought {
                        self.thought.push_str(text);
                    } else {
                        self.text.push_str(text);
                    }
                }
            }
            let mut partial = LlmResponse::from(response);
            partial.partial = true;
            return vec![partial];
        }

        let mut out = Vec::with_capacity(2);
        out.extend(self.take_aggregate());
        out.push(LlmResponse::from(response));
        out
    }

    fn close(&mut self) -> Option<LlmResponse> {
        self.take_aggregate().map(|mut resp| {
            resp.turn_complete = true;
            resp
        })
    }
}
