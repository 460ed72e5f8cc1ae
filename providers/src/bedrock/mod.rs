//! Bedrock adapter
//!
//! Signed cloud endpoint: every call is SigV4-signed with the key pair from
//! the secret store, the body is the Anthropic-on-Bedrock dialect, and
//! streaming arrives as binary length-prefixed frames rather than SSE.

mod config;
pub(crate) mod payload;
mod stream;

pub use config::BedrockConfig;
pub use stream::BedrockStream;

use crate::constants::keys;
use crate::error::model_not_found;
use crate::http::{encode_body, json_headers, HttpClient};
use crate::sign::{self, Credentials, SigningParams};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Instant;
use switchboard_core::{
    ChatRequest, ChatResponse, ChunkStream, Error, ModelSettings, Provider, ProviderInfo, Result,
    SecretStore,
};

pub(crate) const PROVIDER_ID: &str = "bedrock";

/// AWS Bedrock runtime adapter
pub struct Bedrock {
    config: BedrockConfig,
    info: ProviderInfo,
    client: Arc<dyn HttpClient>,
    secrets: Arc<dyn SecretStore>,
}

impl Bedrock {
    /// Create the adapter with default configuration
    pub fn new(client: Arc<dyn HttpClient>, secrets: Arc<dyn SecretStore>) -> Self {
        Self::with_config(BedrockConfig::default(), client, secrets)
    }

    /// Create the adapter with explicit configuration
    pub fn with_config(
        config: BedrockConfig,
        client: Arc<dyn HttpClient>,
        secrets: Arc<dyn SecretStore>,
    ) -> Self {
        let info = ProviderInfo {
            id: PROVIDER_ID.to_string(),
            display_name: "AWS Bedrock".to_string(),
            supports_vision: true,
            supports_streaming: true,
            supports_tools: false,
            models: vec![
                "anthropic.claude-3-5-sonnet-20241022-v2:0".to_string(),
                "anthropic.claude-3-5-haiku-20241022-v1:0".to_string(),
            ],
        };
        Self {
            config,
            info,
            client,
            secrets,
        }
    }

    fn credentials(&self) -> Result<Credentials> {
        let access_key = self
            .secrets
            .load(keys::AWS_ACCESS_KEY_ID)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::missing_credential(PROVIDER_ID, keys::AWS_ACCESS_KEY_ID))?;
        let secret_key = self
            .secrets
            .load(keys::AWS_SECRET_ACCESS_KEY)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::missing_credential(PROVIDER_ID, keys::AWS_SECRET_ACCESS_KEY))?;
        Ok(Credentials {
            access_key,
            secret_key,
        })
    }

    fn region(&self) -> String {
        self.secrets
            .load(keys::AWS_REGION)
            .unwrap_or_else(|| self.config.region.clone())
    }

    /// Sign the invoke and produce the full header set for it
    fn signed_request(
        &self,
        model: &str,
        streaming: bool,
        body: &[u8],
    ) -> Result<(String, HeaderMap)> {
        let credentials = self.credentials()?;
        let region = self.region();
        let host = format!("bedrock-runtime.{region}.amazonaws.com");
        let action = if streaming {
            "invoke-with-response-stream"
        } else {
            "invoke"
        };
        let path = format!("/model/{}/{action}", urlencoding::encode(model));

        let signed = sign::sign(
            &SigningParams {
                method: "POST",
                host: &host,
                path: &path,
                query: &[],
                region: &region,
                service: "bedrock",
                payload: body,
                timestamp: Utc::now(),
            },
            &credentials,
        );

        let mut headers = json_headers();
        let header = |value: &str| {
            HeaderValue::from_str(value)
                .map_err(|_| Error::invalid_response(PROVIDER_ID, "unrepresentable signed header"))
        };
        headers.insert("x-amz-date", header(&signed.amz_date)?);
        headers.insert("x-amz-content-sha256", header(&signed.content_sha256)?);
        headers.insert(reqwest::header::AUTHORIZATION, header(&signed.authorization)?);

        Ok((format!("https://{host}{path}"), headers))
    }
}

#[async_trait]
impl Provider for Bedrock {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn default_settings(&self) -> ModelSettings {
        ModelSettings::for_model(&self.config.default_model)
    }

    fn is_configured(&self) -> bool {
        self.credentials().is_ok()
    }

    async fn send(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = encode_body(PROVIDER_ID, &payload::build_request(&request))?;
        let (url, headers) = self.signed_request(&request.settings.model, false, &body)?;

        let started = Instant::now();
        let value = self
            .client
            .post(&url, headers, body)
            .await
            .map_err(|e| model_not_found(e, &request.settings.model))?;

        payload::parse_response(value, &request.settings.model, started.elapsed())
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let body = encode_body(PROVIDER_ID, &payload::build_request(&request))?;
        let (url, headers) = self.signed_request(&request.settings.model, true, &body)?;

        let bytes = self
            .client
            .post_stream(&url, headers, body)
            .await
            .map_err(|e| model_not_found(e, &request.settings.model))?;

        Ok(Box::pin(BedrockStream::new(bytes)))
    }
}
