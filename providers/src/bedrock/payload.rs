//! Wire shapes for the Anthropic-on-Bedrock dialect
//!
//! Bedrock invokes carry the Anthropic message shape with two differences:
//! the model travels in the URL instead of the body, and the body declares
//! the dialect via `anthropic_version`. Responses and stream events are the
//! Anthropic family shapes, so those types are shared.

use crate::anthropic::payload::{parse_stop_reason, AnthropicMessage, AnthropicResponse, ContentBlock};
use crate::bedrock::PROVIDER_ID;
use crate::constants::BEDROCK_ANTHROPIC_VERSION;
use crate::util::split_system;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use switchboard_core::{ChatRequest, ChatResponse, Error, Result};

#[derive(Debug, Serialize)]
pub struct BedrockRequest {
    pub anthropic_version: String,
    pub messages: Vec<AnthropicMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

/// Build the request body; no `model` and no `stream` flag here, both are
/// expressed through the invoke URL
pub fn build_request(request: &ChatRequest) -> BedrockRequest {
    let (system, turns) = split_system(request);

    BedrockRequest {
        anthropic_version: BEDROCK_ANTHROPIC_VERSION.to_string(),
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
        system,
    }
}

/// Parse a non-streaming invoke answer into the unified shape
///
/// Bedrock omits the model from the body, so the requested model fills in.
pub fn parse_response(value: Value, model: &str, latency: Duration) -> Result<ChatResponse> {
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
        model: if response.model.is_empty() {
            model.to_string()
        } else {
            response.model
        },
        provider: PROVIDER_ID.to_string(),
        finish_reason: response.stop_reason.as_deref().and_then(parse_stop_reason),
    })
}
