//! Wire shapes for the Anthropic messages API

use crate::anthropic::PROVIDER_ID;
use crate::util::split_system;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use switchboard_core::{ChatRequest, ChatResponse, Error, FinishReason, Result};

// Request types

#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub messages: Vec<AnthropicMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

/// Build the request body; the system prompt rides in its own field
pub fn build_request(request: &ChatRequest, stream: bool) -> AnthropicRequest {
    let (system, turns) = split_system(request);

    AnthropicRequest {
        model: request.settings.model.clone(),
        messages: turns
            .iter()
            .map(|m| AnthropicMessage {
                role: m.role.as_str().to_string(),
                content: m.content.clone(),
            })
            .collect(),
        max_tokens: request.settings.max_tokens,
        temperature: request.settings.temperature,
        top_p: request.settings.top_p,
        stream,
        system,
    }
}

// Response types

#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub model: String,
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Option<UsageCounts>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    #[serde(rename = "text")]
    Text {
        /// The block's text
        text: String,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UsageCounts {
    #[serde(default)]
    pub input_tokens: Option<u32>,
    #[serde(default)]
    pub output_tokens: Option<u32>,
}

/// Parse a non-streaming answer into the unified shape
pub fn parse_response(value: Value, latency: Duration) -> Result<ChatResponse> {
    let response: AnthropicResponse = serde_json::from_value(value)
        .map_err(|e| Error::invalid_response(PROVIDER_ID, e.to_string()))?;

    let content = response
        .content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Unknown => None,
        })
        .collect::<Vec<_>>()
        .join("");

    let usage = response.usage.unwrap_or_default();

    Ok(ChatResponse {
        content,
        input_tokens: usage.input_tokens,
        output_tokens: usage.output_tokens,
        latency,
        model: response.model,
        provider: PROVIDER_ID.to_string(),
        finish_reason: response.stop_reason.as_deref().and_then(parse_stop_reason),
    })
}

pub fn parse_stop_reason(reason: &str) -> Option<FinishReason> {
    match reason {
        "end_turn" | "stop_sequence" => Some(FinishReason::Stop),
        "max_tokens" => Some(FinishReason::Length),
        _ => None,
    }
}

// Streaming event types

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum AnthropicStreamEvent {
    #[serde(rename = "message_start")]
    MessageStart { message: StartMessage },
    #[serde(rename = "content_block_start")]
    ContentBlockStart,
    #[serde(rename = "content_block_delta")]
    ContentBlockDelta { delta: ContentDelta },
    #[serde(rename = "content_block_stop")]
    ContentBlockStop,
    #[serde(rename = "message_delta")]
    MessageDelta {
        #[serde(default)]
        usage: Option<UsageCounts>,
    },
    #[serde(rename = "message_stop")]
    MessageStop,
    #[serde(rename = "ping")]
    Ping,
    #[serde(rename = "error")]
    Error { error: ApiError },
}

#[derive(Debug, Deserialize)]
pub struct StartMessage {
    #[serde(default)]
    pub usage: Option<UsageCounts>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum ContentDelta {
    #[serde(rename = "text_delta")]
    TextDelta { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

/// Map a top-level error event to its taxonomy kind
pub fn map_api_error(error: &ApiError) -> Error {
    match error.kind.as_str() {
        "rate_limit_error" => Error::RateLimited { retry_after: None },
        "authentication_error" => Error::server(401, error.message.clone()),
        "permission_error" => Error::server(403, error.message.clone()),
        "not_found_error" => Error::server(404, error.message.clone()),
        "invalid_request_error" => Error::server(400, error.message.clone()),
        "overloaded_error" => Error::server(529, error.message.clone()),
        _ => Error::server(500, error.message.clone()),
    }
}
