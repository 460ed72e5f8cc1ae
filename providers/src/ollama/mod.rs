//! Ollama adapter
//!
//! Speaks to the local daemon's chat endpoint over NDJSON. No credentials:
//! the adapter is always configured. The model catalog is dynamic, backed by
//! the daemon's tags endpoint, and transport failures carry a hint that the
//! daemon may simply not be running.

mod config;
pub(crate) mod payload;
mod stream;

pub use config::OllamaConfig;
pub use stream::OllamaStream;

use crate::constants::keys;
use crate::error::model_not_found;
use crate::http::{encode_body, json_headers, HttpClient};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use std::time::Instant;
use switchboard_core::{
    ChatRequest, ChatResponse, ChunkStream, Error, ModelSettings, Provider, ProviderInfo, Result,
    SecretStore,
};

pub(crate) const PROVIDER_ID: &str = "ollama";

/// Local Ollama daemon adapter
pub struct Ollama {
    config: OllamaConfig,
    info: ProviderInfo,
    client: Arc<dyn HttpClient>,
    secrets: Arc<dyn SecretStore>,
}

impl Ollama {
    /// Create the adapter with default configuration
    pub fn new(client: Arc<dyn HttpClient>, secrets: Arc<dyn SecretStore>) -> Self {
        Self::with_config(OllamaConfig::default(), client, secrets)
    }

    /// Create the adapter with explicit configuration
    pub fn with_config(
        config: OllamaConfig,
        client: Arc<dyn HttpClient>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        let info = ProviderInfo {
            id: PROVIDER_ID.to_string(),
            display_name: "Ollama".to_string(),
            supports_vision: false,
            supports_streaming: true,
            supports_tools: false,
            models: vec![config.default_model.clone()],
        };
        Self {
            config,
            info,
            client,
            secrets,
        }
    }

    fn base_url(&self) -> String {
        self.secrets
            .load(keys::OLLAMA_BASE_URL)
            .unwrap_or_else(|| self.config.base_url.clone())
    }

    /// Annotate transport failures with the most likely cause for a
    /// loopback backend: nothing is listening
    fn daemon_hint(error: Error, base_url: &str) -> Error {
        match error {
            Error::Network { message, source } => Error::Network {
                message: format!("{message} (is the Ollama daemon running at {base_url}?)"),
                source,
            },
            other => other,
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn default_settings(&self) -> ModelSettings {
        ModelSettings::for_model(&self.config.default_model)
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, request: ChatRequest) -> Result<ChatResponse> {
        let base = self.base_url();
        let url = format!("{base}/api/chat");
        let body = encode_body(PROVIDER_ID, &payload::build_request(&request, false))?;

        let started = Instant::now();
        let value = self
            .client
            .post(&url, json_headers(), body)
            .await
            .map_err(|e| Self::daemon_hint(e, &base))
            .map_err(|e| model_not_found(e, &request.settings.model))?;

        payload::parse_response(value, started.elapsed())
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let base = self.base_url();
        let url = format!("{base}/api/chat");
        let body = encode_body(PROVIDER_ID, &payload::build_request(&request, true))?;

        let bytes = self
            .client
            .post_stream(&url, json_headers(), body)
            .await
            .map_err(|e| Self::daemon_hint(e, &base))
            .map_err(|e| model_not_found(e, &request.settings.model))?;

        Ok(Box::pin(OllamaStream::new(bytes)))
    }

    async fn list_models(&self) -> Result<Vec<String>> {
        let base = self.base_url();
        let url = format!("{base}/api/tags");

        let value = self
            .client
            .get(&url, HeaderMap::new())
            .await
            .map_err(|e| Self::daemon_hint(e, &base))?;

        payload::parse_tags(value)
    }

    fn supports_model_listing(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHttp;
    use serde_json::json;
    use switchboard_core::MemoryStore;

    fn adapter(http: Arc<MockHttp>) -> Ollama {
        Ollama::new(http, Arc::new(MemoryStore::new()))
    }

    fn request(text: &str) -> ChatRequest {
        ChatRequest::builder().user(text).model("llama3.2").build()
    }

    #[test]
    fn always_configured() {
        let provider = adapter(Arc::new(MockHttp::new()));
        assert!(provider.is_configured());
        assert!(provider.supports_model_listing());
    }

    #[tokio::test]
    async fn send_posts_the_chat_endpoint() {
        let http = Arc::new(MockHttp::new());
        http.respond_with(json!({
            "model": "llama3.2",
            "message": {"role": "assistant", "content": "hey"},
            "done": true,
            "prompt_eval_count": 7,
            "eval_count": 3
        }));
        let provider = adapter(http.clone());

        let response = provider.send(request("hi")).await.unwrap();
        assert_eq!(response.content, "hey");
        assert_eq!(response.input_tokens, Some(7));
        assert_eq!(response.output_tokens, Some(3));
        assert_eq!(response.provider, "ollama");

        let posts = http.posts();
        assert_eq!(posts[0].0, "http://localhost:11434/api/chat");
        let body: serde_json::Value = serde_json::from_slice(&posts[0].2).unwrap();
        assert_eq!(body["stream"], false);
    }

    #[tokio::test]
    async fn base_url_override_comes_from_the_store() {
        let http = Arc::new(MockHttp::new());
        http.respond_with(json!({
            "model": "llama3.2",
            "message": {"role": "assistant", "content": "x"},
            "done": true
        }));
        let secrets = MemoryStore::with_secrets([("OLLAMA_BASE_URL", "http://10.0.0.5:11434")]);
        let provider = Ollama::new(http.clone(), Arc::new(secrets));

        provider.send(request("hi")).await.unwrap();
        assert_eq!(http.posts()[0].0, "http://10.0.0.5:11434/api/chat");
    }

    #[tokio::test]
    async fn connection_failure_hints_at_the_daemon() {
        let http = Arc::new(MockHttp::new());
        http.fail_with(Error::network("connection refused"));
        let provider = adapter(http);

        let err = provider.send(request("hi")).await.unwrap_err();
        match err {
            Error::Network { message, .. } => {
                assert!(message.contains("is the Ollama daemon running"));
                assert!(message.contains("http://localhost:11434"));
            }
            other => panic!("expected Network, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_models_queries_the_tags_endpoint() {
        let http = Arc::new(MockHttp::new());
        http.respond_with(json!({
            "models": [{"name": "llama3.2:latest"}, {"name": "qwen2.5:7b"}]
        }));
        let provider = adapter(http.clone());

        let models = provider.list_models().await.unwrap();
        assert_eq!(models, vec!["llama3.2:latest", "qwen2.5:7b"]);
        assert_eq!(http.gets()[0].0, "http://localhost:11434/api/tags");
    }

    #[tokio::test]
    async fn not_found_becomes_model_unavailable() {
        let http = Arc::new(MockHttp::new());
        http.fail_with(Error::server(404, "no such model"));
        let provider = adapter(http);

        let err = provider.send(request("hi")).await.unwrap_err();
        assert!(matches!(err, Error::ModelUnavailable { model } if model == "llama3.2"));
    }
}
