//! OpenAI-compatible adapter family
//!
//! One adapter serves every vendor speaking the chat-completions dialect;
//! a [`Preset`] pins the identity, endpoint, and credential key. These
//! backends go through the single-yield streaming fallback, so only the
//! whole-response path exists here.

mod config;
pub(crate) mod payload;

pub use config::Preset;

use crate::error::model_not_found;
use crate::http::{credential_header, encode_body, json_headers, HttpClient};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use std::sync::Arc;
use std::time::Instant;
use switchboard_core::{
    ChatRequest, ChatResponse, Error, ModelSettings, Provider, ProviderInfo, Result, SecretStore,
};

/// Adapter for any OpenAI-compatible REST backend
pub struct OpenAiCompatible {
    preset: Preset,
    info: ProviderInfo,
    client: Arc<dyn HttpClient>,
    secrets: Arc<dyn SecretStore>,
}

impl OpenAiCompatible {
    /// Create an adapter for one preset vendor
    pub fn new(preset: Preset, client: Arc<dyn HttpClient>, secrets: Arc<dyn SecretStore>) -> Self {
        let info = ProviderInfo {
            id: preset.id().to_string(),
            display_name: preset.display_name().to_string(),
            supports_vision: preset.supports_vision(),
            supports_streaming: false,
            supports_tools: false,
            models: preset.models(),
        };
        Self {
            preset,
            info,
            client,
            secrets,
        }
    }

    fn api_key(&self) -> Result<String> {
        let key_name = self.preset.api_key_name();
        self.secrets
            .load(key_name)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::missing_credential(self.preset.id(), key_name))
    }

    fn base_url(&self) -> String {
        self.secrets
            .load(self.preset.base_url_name())
            .unwrap_or_else(|| self.preset.base_url().to_string())
    }

    fn headers(&self, api_key: &str) -> Result<HeaderMap> {
        let mut headers = json_headers();
        headers.insert(
            AUTHORIZATION,
            credential_header(
                self.preset.id(),
                self.preset.api_key_name(),
                &format!("Bearer {api_key}"),
            )?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl Provider for OpenAiCompatible {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn default_settings(&self) -> ModelSettings {
        ModelSettings::for_model(self.preset.default_model())
    }

    fn is_configured(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn send(&self, request: ChatRequest) -> Result<ChatResponse> {
        let api_key = self.api_key()?;
        let headers = self.headers(&api_key)?;
        let url = format!("{}/v1/chat/completions", self.base_url());
        let body = encode_body(self.preset.id(), &payload::build_request(&request))?;

        let started = Instant::now();
        let value = self
            .client
            .post(&url, headers, body)
            .await
            .map_err(|e| model_not_found(e, &request.settings.model))?;

        payload::parse_response(self.preset.id(), value, started.elapsed())
    }
}
