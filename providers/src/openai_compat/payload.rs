//! Wire shapes for the OpenAI chat-completions dialect

use crate::util::split_system;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use switchboard_core::{ChatRequest, ChatResponse, Error, FinishReason, Result};

// Request types

#[derive(Debug, Serialize)]
pub struct ChatCompletionsRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionsMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionsMessage {
    pub role: String,
    pub content: String,
}

/// Build the request body; the system prompt becomes a leading system turn
pub fn build_request(request: &ChatRequest) -> ChatCompletionsRequest {
    let (system, turns) = split_system(request);

    let mut messages = Vec::with_capacity(turns.len() + 1);
    if let Some(system) = system {
        messages.push(ChatCompletionsMessage {
            role: "system".to_string(),
            content: system,
        });
    }
    messages.extend(turns.iter().map(|m| ChatCompletionsMessage {
        role: m.role.as_str().to_string(),
        content: m.content.clone(),
    }));

    ChatCompletionsRequest {
        model: request.settings.model.clone(),
        messages,
        max_tokens: request.settings.max_tokens,
        temperature: request.settings.temperature,
        top_p: request.settings.top_p,
    }
}

// Response types

#[derive(Debug, Deserialize)]
pub struct ChatCompletionsResponse {
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    #[serde(default)]
    pub completion_tokens: Option<u32>,
}

/// Parse an answer into the unified shape
pub fn parse_response(provider: &str, value: Value, latency: Duration) -> Result<ChatResponse> {
    let response: ChatCompletionsResponse = serde_json::from_value(value)
        .map_err(|e| Error::invalid_response(provider, e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_response(provider, "response has no choices"))?;

    let (input_tokens, output_tokens) = match response.usage {
        Some(usage) => (usage.prompt_tokens, usage.completion_tokens),
        None => (None, None),
    };

    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        input_tokens,
        output_tokens,
        latency,
        model: response.model,
        provider: provider.to_string(),
        finish_reason: choice.finish_reason.as_deref().and_then(parse_finish_reason),
    })
}

pub fn parse_finish_reason(reason: &str) -> Option<FinishReason> {
    match reason {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        "content_filter" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}
