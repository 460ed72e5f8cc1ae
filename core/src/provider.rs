//! The backend capability contract

use crate::error::Result;
use crate::types::chunk::StreamChunk;
use crate::types::info::ProviderInfo;
use crate::types::request::ChatRequest;
use crate::types::response::ChatResponse;
use crate::types::settings::ModelSettings;
use async_trait::async_trait;
use futures::stream;
use std::pin::Pin;

/// The stream type every adapter yields
///
/// Boxed rather than an associated type so the registry can hold adapters as
/// `Arc<dyn Provider>` and swap them at runtime.
pub type ChunkStream = Pin<Box<dyn futures_core::Stream<Item = Result<StreamChunk>> + Send>>;

/// The uniform contract every backend adapter implements
///
/// One flat implementation per backend, no hierarchy. Adapters resolve
/// credentials before any network traffic, normalize every failure into the
/// unified error taxonomy, and never retain request state across calls.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Static capability descriptor
    fn info(&self) -> &ProviderInfo;

    /// Built-in generation defaults for this backend
    fn default_settings(&self) -> ModelSettings;

    /// Whether every required credential is present in the secret store
    ///
    /// Backends without credentials are always configured.
    fn is_configured(&self) -> bool;

    /// Send a request and get a complete response
    async fn send(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Send a request and get a stream of chunks
    ///
    /// Backends without native streaming inherit the single-yield fallback:
    /// one `send`, one content chunk, then completion. Streaming stays a
    /// uniform path for callers either way.
    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let response = self.send(request).await?;
        Ok(single_yield(response))
    }

    /// Current model catalog
    ///
    /// Defaults to the descriptor's static list; backends with a live
    /// catalog endpoint override this and report
    /// [`supports_model_listing`](Provider::supports_model_listing).
    async fn list_models(&self) -> Result<Vec<String>> {
        Ok(self.info().models.clone())
    }

    /// Whether `list_models` queries the backend rather than echoing the
    /// static descriptor list
    fn supports_model_listing(&self) -> bool {
        false
    }
}

/// Wrap a complete response as a chunk stream
///
/// Emits the whole text as one content chunk, then a usage chunk when the
/// response carried token counts.
pub fn single_yield(response: ChatResponse) -> ChunkStream {
    let mut chunks = vec![Ok(StreamChunk::Content(response.content))];
    if response.input_tokens.is_some() || response.output_tokens.is_some() {
        chunks.push(Ok(StreamChunk::Usage {
            input: response.input_tokens.unwrap_or(0),
            output: response.output_tokens.unwrap_or(0),
        }));
    }
    Box::pin(stream::iter(chunks))
}
