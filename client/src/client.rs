//! Gateway client over the registry

use crate::turn::Turn;
use std::sync::Arc;
use std::time::Instant;
use switchboard_core::{
    single_yield, ChatRequest, ChatResponse, Error, Message, Provider, Result,
};
use switchboard_registry::ProviderRegistry;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// High-level entry point: one uniform send/stream surface over whichever
/// backend the registry currently has active
pub struct Client {
    registry: Arc<ProviderRegistry>,
}

impl Client {
    /// Create a client over a registry
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this client resolves the active backend from
    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    fn build_request(&self, prompt: &str, history: &[Message]) -> Result<(Arc<dyn Provider>, ChatRequest)> {
        let (provider, settings) = self.registry.active()?;
        let mut messages = history.to_vec();
        messages.push(Message::user(prompt));
        Ok((provider, ChatRequest::new(messages, settings)))
    }

    /// Single-shot request against the active backend
    pub async fn request(&self, prompt: &str, history: &[Message]) -> Result<ChatResponse> {
        let (provider, request) = self.build_request(prompt, history)?;
        provider.send(request).await
    }

    /// Streamed request against the active backend
    pub async fn stream(&self, prompt: &str, history: &[Message]) -> Result<Turn> {
        self.stream_with(prompt, history, CancellationToken::new())
            .await
    }

    /// Streamed request carrying an external cancellation token
    ///
    /// Mode selection: when the descriptor denies streaming or the settings
    /// turn it off, the whole-response path is wrapped by the single-yield
    /// fallback. A failed native stream setup also degrades to single-shot,
    /// except for failures that would repeat identically (missing
    /// credential, denied capability).
    pub async fn stream_with(
        &self,
        prompt: &str,
        history: &[Message],
        token: CancellationToken,
    ) -> Result<Turn> {
        let (provider, request) = self.build_request(prompt, history)?;
        let provider_id = provider.info().id.clone();
        let model = request.settings.model.clone();

        // Clock starts here so the reported latency covers stream setup
        let started = Instant::now();
        let native = provider.info().supports_streaming && request.settings.use_streaming;
        let inner = if native {
            match provider.stream(request.clone()).await {
                Ok(stream) => stream,
                Err(e @ (Error::MissingCredential { .. } | Error::Unsupported { .. })) => {
                    return Err(e);
                }
                Err(e) => {
                    warn!(provider = %provider_id, error = %e, "stream setup failed, degrading to single-shot");
                    single_yield(provider.send(request).await?)
                }
            }
        } else {
            single_yield(provider.send(request).await?)
        };

        Ok(Turn::new(provider_id, model, inner, token, started))
    }
}
