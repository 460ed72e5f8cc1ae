//! Gemini adapter
//!
//! Plain-JSON REST against the generateContent endpoint, key carried as a
//! query parameter. No native incremental streaming on this path, so the
//! single-yield fallback covers `stream`.

mod config;
pub(crate) mod payload;

pub use config::GeminiConfig;

use crate::constants::keys;
use crate::error::model_not_found;
use crate::http::{encode_body, json_headers, HttpClient};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use switchboard_core::{
    ChatRequest, ChatResponse, Error, ModelSettings, Provider, ProviderInfo, Result, SecretStore,
};

pub(crate) const PROVIDER_ID: &str = "gemini";

/// Google Gemini adapter
pub struct Gemini {
    config: GeminiConfig,
    info: ProviderInfo,
    client: Arc<dyn HttpClient>,
    secrets: Arc<dyn SecretStore>,
}

impl Gemini {
    /// Create the adapter with default configuration
    pub fn new(client: Arc<dyn HttpClient>, secrets: Arc<dyn SecretStore>) -> Self {
        Self::with_config(GeminiConfig::default(), client, secrets)
    }

    /// Create the adapter with explicit configuration
    pub fn with_config(
        config: GeminiConfig,
        client: Arc<dyn HttpClient>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        let info = ProviderInfo {
            id: PROVIDER_ID.to_string(),
            display_name: "Gemini".to_string(),
            supports_vision: true,
            supports_streaming: false,
            supports_tools: false,
            models: vec![
                "gemini-1.5-flash".to_string(),
                "gemini-1.5-pro".to_string(),
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
            .load(keys::GEMINI_API_KEY)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::missing_credential(PROVIDER_ID, keys::GEMINI_API_KEY))
    }

    fn base_url(&self) -> String {
        self.secrets
            .load(keys::GEMINI_BASE_URL)
            .unwrap_or_else(|| self.config.base_url.clone())
    }
}

#[async_trait]
impl Provider for Gemini {
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
        let model = request.settings.model.clone();
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url(),
            model,
            urlencoding::encode(&api_key)
        );
        let body = encode_body(PROVIDER_ID, &payload::build_request(&request))?;

        let started = Instant::now();
        let value = self
            .client
            .post(&url, json_headers(), body)
            .await
            .map_err(|e| model_not_found(e, &model))?;

        payload::parse_response(value, &model, started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHttp;
    use serde_json::json;
    use switchboard_core::MemoryStore;

    fn answer() -> serde_json::Value {
        json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "hello"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2}
        })
    }

    fn request(text: &str) -> ChatRequest {
        ChatRequest::builder()
            .user(text)
            .model("gemini-1.5-flash")
            .build()
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_network_call() {
        let http = Arc::new(MockHttp::new());
        let provider = Gemini::new(http.clone(), Arc::new(MemoryStore::new()));

        let err = provider.send(request("hi")).await.unwrap_err();
        assert!(matches!(err, Error::MissingCredential { key, .. } if key == "GEMINI_API_KEY"));
        assert_eq!(http.call_count(), 0);
    }

    #[tokio::test]
    async fn key_rides_in_the_query_string() {
        let http = Arc::new(MockHttp::new());
        http.respond_with(answer());
        let secrets = MemoryStore::with_secrets([("GEMINI_API_KEY", "g-test")]);
        let provider = Gemini::new(http.clone(), Arc::new(secrets));

        let response = provider.send(request("hi")).await.unwrap();
        assert_eq!(response.content, "hello");
        assert_eq!(response.provider, "gemini");
        assert_eq!(response.model, "gemini-1.5-flash");

        assert_eq!(
            http.posts()[0].0,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=g-test"
        );
    }

    #[test]
    fn no_native_streaming_advertised() {
        let provider = Gemini::new(Arc::new(MockHttp::new()), Arc::new(MemoryStore::new()));
        assert!(!provider.info().supports_streaming);
    }
}
