//! Model trait and the Responses API implementation

pub mod openai;

use async_trait::async_trait;
use futures_util::stream::{self, BoxStream, StreamExt};

use crate::error::LlmError;
use crate::types::{LlmRequest, LlmResponse};

/// Stream of application responses; an error is always the final item
pub type LlmResponseStream = BoxStream<'static, Result<LlmResponse, LlmError>>;

/// Trait implemented by each model backend
#[async_trait]
pub trait Llm: Send + Sync {
    /// Model name used when a request does not override it
    fn name(&self) -> &str;

    /// Send a request and wait for the complete response
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Send a request and stream the response as it is generated
    async fn generate_stream(&self, request: &LlmRequest) -> Result<LlmResponseStream, LlmError>;

    /// Generate content as a stream of responses
    ///
    /// The non-streaming path yields exactly one item. Errors are yielded as
    /// the last item rather than returned.
    fn generate_content<'a>(
        &'a self,
        request: &'a LlmRequest,
        streaming: bool,
    ) -> BoxStream<'a, Result<LlmResponse, LlmError>> {
        if streaming {
            stream::once(self.generate_stream(request))
                .flat_map(|result| match result {
                    Ok(responses) => responses,
                    Err(e) => stream::once(async move { Err(e) }).boxed(),
                })
                .boxed()
        } else {
            stream::once(self.generate(request)).boxed()
        }
    }
}
