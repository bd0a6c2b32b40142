//! `OpenAI` Responses API model

use std::collections::VecDeque;
use std::pin::Pin;

use async_trait::async_trait;
use eventsource_stream::{EventStreamError, Eventsource};
use futures_util::future::ready;
use futures_util::stream::{self, Stream, StreamExt};
use relay_config::{DEFAULT_BASE_URL, OpenAiConfig};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use super::{Llm, LlmResponseStream};
use crate::aggregator::{ResponseAggregator, StreamingAggregator};
use crate::convert::request::build_request;
use crate::convert::response::convert_response;
use crate::convert::stream::StreamTranslator;
use crate::error::LlmError;
use crate::protocol::openai::{OpenAiErrorResponse, ResponseObject, ResponseStreamEvent, ResponsesRequest};
use crate::types::{LlmRequest, LlmResponse};

/// Metadata key holding the vendor response ID
pub const METADATA_RESPONSE_ID: &str = "openai_response_id";
/// Metadata key holding the model reported by the vendor
pub const METADATA_MODEL: &str = "openai_model";

const EVENT_STREAM: &str = "text/event-stream";

/// Model backed by the `OpenAI` Responses API
pub struct OpenAiModel {
    name: String,
    client: Client,
    endpoint: String,
    api_key: SecretString,
    organization: Option<String>,
    project: Option<String>,
}

impl OpenAiModel {
    /// Create a model with a client built from the configured timeout
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ModelNameRequired`] for an empty name,
    /// [`LlmError::MissingCredentials`] when no API key is configured, and
    /// [`LlmError::Transport`] if the HTTP client cannot be built.
    pub fn new(name: impl Into<String>, config: &OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Self::with_client(name, config, client)
    }

    /// Create a model for the configured default model name
    ///
    /// # Errors
    ///
    /// See [`OpenAiModel::new`].
    pub fn from_config(config: &OpenAiConfig) -> Result<Self, LlmError> {
        Self::new(config.model.clone(), config)
    }

    /// Create a model that sends requests through `client`
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ModelNameRequired`] for an empty name and
    /// [`LlmError::MissingCredentials`] when no API key is configured.
    pub fn with_client(name: impl Into<String>, config: &OpenAiConfig, client: Client) -> Result<Self, LlmError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LlmError::ModelNameRequired);
        }

        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.expose_secret().is_empty())
            .ok_or(LlmError::MissingCredentials)?;

        let base = config
            .base_url
            .as_ref()
            .map_or(DEFAULT_BASE_URL, url::Url::as_str)
            .trim_end_matches('/');

        Ok(Self {
            name,
            client,
            endpoint: format!("{base}/responses"),
            api_key,
            organization: config.organization.clone().filter(|v| !v.is_empty()),
            project: config.project.clone().filter(|v| !v.is_empty()),
        })
    }

    /// Responses endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, body: &ResponsesRequest) -> RequestBuilder {
        let mut builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(body);

        if let Some(org) = &self.organization {
            builder = builder.header("OpenAI-Organization", org);
        }
        if let Some(project) = &self.project {
            builder = builder.header("OpenAI-Project", project);
        }

        builder
    }

    async fn send(&self, body: &ResponsesRequest) -> Result<Response, LlmError> {
        tracing::debug!(
            model = %body.model,
            items = body.input.len(),
            tools = body.tools.len(),
            stream = body.stream.unwrap_or(false),
            "sending responses request"
        );

        let response = self.request(body).send().await.map_err(|e| {
            tracing::error!(model = %self.name, error = %e, "upstream request failed");
            LlmError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(model = %self.name, status = %status, "upstream returned error");
            return Err(LlmError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&text),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Llm for OpenAiModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let wire_request = build_request(&self.name, request)?;
        let response = self.send(&wire_request).await?;

        let bytes = response.bytes().await?;
        let body: Option<ResponseObject> = serde_json::from_slice(&bytes).map_err(LlmError::InvalidResponse)?;
        let body = body.ok_or(LlmError::EmptyResponse)?;

        let mut out = LlmResponse::from(convert_response(&body)?);
        out.custom_metadata
            .insert(METADATA_RESPONSE_ID.to_owned(), Value::String(body.id));
        out.custom_metadata
            .insert(METADATA_MODEL.to_owned(), Value::String(body.model));

        Ok(out)
    }

    async fn generate_stream(&self, request: &LlmRequest) -> Result<LlmResponseStream, LlmError> {
        let mut wire_request = build_request(&self.name, request)?;
        wire_request.stream = Some(true);

        let response = self.send(&wire_request).await?;
        if !is_event_stream(&response) {
            tracing::warn!(model = %self.name, "streaming requested but response is not an event stream");
            return Err(LlmError::StreamingUnavailable);
        }

        let events = response.bytes_stream().eventsource().filter_map(|result| {
            ready(match result {
                Ok(event) => parse_event(&event.data),
                Err(EventStreamError::Transport(e)) => Some(Err(LlmError::Transport(e))),
                Err(e) => Some(Err(LlmError::StreamError(e.to_string()))),
            })
        });

        Ok(translate_stream(events, StreamingAggregator::new()))
    }
}

/// Decode one SSE data payload; blank payloads and the `[DONE]` sentinel are skipped
fn parse_event(data: &str) -> Option<Result<ResponseStreamEvent, LlmError>> {
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(serde_json::from_str(data).map_err(LlmError::MalformedEvent))
}

fn is_event_stream(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().starts_with(EVENT_STREAM))
}

/// Extract the error message from a vendor error body, falling back to the raw body
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<OpenAiErrorResponse>(body).map_or_else(|_| body.trim().to_owned(), |e| e.error.message)
}

struct TranslateState<A> {
    events: Pin<Box<dyn Stream<Item = Result<ResponseStreamEvent, LlmError>> + Send>>,
    translator: StreamTranslator,
    aggregator: A,
    pending: VecDeque<Result<LlmResponse, LlmError>>,
    finished: bool,
}

/// Drive decoded stream events through a translator and aggregator
///
/// Events are pulled only as the returned stream is polled. The first
/// error ends the stream; when the events run out the aggregator is closed
/// and its final response, if any, is yielded last.
pub fn translate_stream<S, A>(events: S, aggregator: A) -> LlmResponseStream
where
    S: Stream<Item = Result<ResponseStreamEvent, LlmError>> + Send + 'static,
    A: ResponseAggregator + 'static,
{
    let state = TranslateState {
        events: Box::pin(events),
        translator: StreamTranslator::new(),
        aggregator,
        pending: VecDeque::new(),
        finished: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }
            if state.finished {
                return None;
            }

            match state.events.next().await {
                Some(Ok(event)) => match state.translator.process(event) {
                    Ok(Some(micro)) => state.pending.extend(state.aggregator.process(micro).into_iter().map(Ok)),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "response stream failed");
                        state.finished = true;
                        state.pending.push_back(Err(e));
                    }
                },
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "response stream interrupted");
                    state.finished = true;
                    state.pending.push_back(Err(e));
                }
                None => {
                    state.finished = true;
                    if let Some(last) = state.aggregator.close() {
                        state.pending.push_back(Ok(last));
                    }
                }
            }
        }
    })
    .boxed()
}
