//! HTTP client abstraction and utilities
//!
//! Adapters never touch `reqwest` directly; they go through [`HttpClient`] so
//! tests can substitute a mock transport and assert on exactly what would
//! have gone over the wire. Bodies are raw bytes because the signed backend
//! must hash the exact octets it sends.

use crate::error::{classify_status, network_error, parse_retry_after};
use bytes::Bytes;
use futures::Stream;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use serde_json::Value;
use std::pin::Pin;
use switchboard_core::{Error, Result};

/// Type alias for response byte streams
pub type ResponseStream = Pin<Box<dyn Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Send>>;

/// HTTP client abstraction
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a GET request and parse the JSON answer
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Value>;

    /// Send a POST request and parse the JSON answer
    async fn post(&self, url: &str, headers: HeaderMap, body: Vec<u8>) -> Result<Value>;

    /// Send a POST request and return the raw response byte stream
    async fn post_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<ResponseStream>;
}

/// Default HTTP client implementation using reqwest
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new HTTP client
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(network_error)?;

        Ok(Self { client })
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, retry_after, &body))
    }
}

#[async_trait::async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .map_err(network_error)?;

        let response = Self::check(response).await?;
        response.json().await.map_err(network_error)
    }

    async fn post(&self, url: &str, headers: HeaderMap, body: Vec<u8>) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(network_error)?;

        let response = Self::check(response).await?;
        response.json().await.map_err(network_error)
    }

    async fn post_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<ResponseStream> {
        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(network_error)?;

        let response = Self::check(response).await?;
        Ok(Box::pin(response.bytes_stream()))
    }
}

/// Headers shared by the JSON backends
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers
}

/// Build a header value from a stored credential
///
/// Secrets with non-ASCII or control bytes can never form a valid header, so
/// they are reported as an unusable credential for `key`.
pub fn credential_header(provider: &str, key: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::missing_credential(provider, key))
}

/// Serialize an outbound payload
pub fn encode_body<T: serde::Serialize>(provider: &str, payload: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(payload)
        .map_err(|e| Error::invalid_response(provider, format!("request encoding failed: {e}")))
}
