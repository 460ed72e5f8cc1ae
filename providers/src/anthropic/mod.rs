//! Anthropic adapter
//!
//! Direct REST against the messages endpoint, streaming over SSE. The system
//! prompt travels in a dedicated `system` field; credentials are resolved
//! through the secret store on every call.

mod config;
pub(crate) mod payload;
mod stream;

pub use config::AnthropicConfig;
pub use stream::AnthropicStream;

use crate::constants::{keys, ANTHROPIC_VERSION};
use crate::error::model_not_found;
use crate::http::{credential_header, encode_body, json_headers, HttpClient};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Instant;
use switchboard_core::{
    ChatRequest, ChatResponse, ChunkStream, Error, ModelSettings, Provider, ProviderInfo, Result,
    SecretStore,
};

pub(crate) const PROVIDER_ID: &str = "anthropic";

/// Anthropic messages-API adapter
pub struct Anthropic {
    config: AnthropicConfig,
    info: ProviderInfo,
    client: Arc<dyn HttpClient>,
    secrets: Arc<dyn SecretStore>,
}

impl Anthropic {
    /// Create the adapter with default configuration
    pub fn new(client: Arc<dyn HttpClient>, secrets: Arc<dyn SecretStore>) -> Self {
        Self::with_config(AnthropicConfig::default(), client, secrets)
    }

    /// Create the adapter with explicit configuration
    pub fn with_config(
        config: AnthropicConfig,
        client: Arc<dyn HttpClient>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        let info = ProviderInfo {
            id: PROVIDER_ID.to_string(),
            display_name: "Anthropic".to_string(),
            supports_vision: true,
            supports_streaming: true,
            supports_tools: true,
            models: vec![
                "claude-3-5-sonnet-latest".to_string(),
                "claude-3-5-haiku-latest".to_string(),
                "claude-3-opus-latest".to_string(),
            ],
        };
        Self {
            config,
            info,
            client,
            secrets,
        }
    }

    fn api_key(&self) -> Result<String> {
        self.secrets
            .load(keys::ANTHROPIC_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::missing_credential(PROVIDER_ID, keys::ANTHROPIC_API_KEY))
    }

    fn base_url(&self) -> String {
        self.secrets
            .load(keys::ANTHROPIC_BASE_URL)
            .unwrap_or_else(|| self.config.base_url.clone())
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = json_headers();
        headers.insert(
            "x-api-key",
            credential_header(PROVIDER_ID, keys::ANTHROPIC_API_KEY, api_key)?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        Ok(headers)
    }
}

#[async_trait]
impl Provider for Anthropic {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn default_settings(&self) -> ModelSettings {
        ModelSettings::for_model(&self.config.default_model)
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn send(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = self.api_key()?;
        let headers = self.headers(&api_key)?;
        let url = format!("{}/v1/messages", self.base_url());
        let body = encode_body(PROVIDER_ID, &payload::build_request(&request, false))?;

        let started = Instant::now();
        let value = self
            .client
            .post(&url, headers, body)
            .await
            .map_err(|e| model_not_found(e, &request.settings.model))?;

        payload::parse_response(value, started.elapsed())
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let api_key = self.api_key()?;
        let headers = self.headers(&api_key)?;
        let url = format!("{}/v1/messages", self.base_url());
        let body = encode_body(PROVIDER_ID, &payload::build_request(&request, true))?;

        let bytes = self
            .client
            .post_stream(&url, headers, body)
            .await
            .map_err(|e| model_not_found(e, &request.settings.model))?;

        Ok(Box::pin(AnthropicStream::new(bytes)))
    }
}
