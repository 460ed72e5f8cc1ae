//! Wire shapes for the Gemini generateContent API
//!
//! The family expects `role: "model"` for assistant turns and has no system
//! field on this endpoint, so the system prompt is folded into the first
//! user turn.

use crate::gemini::PROVIDER_ID;
use crate::util::split_system;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use switchboard_core::{ChatRequest, ChatResponse, Error, FinishReason, Result, Role};

// Request types

#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "topP")]
    pub top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::Assistant => "model",
        _ => "user",
    }
}

/// Build the request body, folding the system prompt into the first user turn
pub fn build_request(request: &ChatRequest) -> GeminiRequest {
    let (system, turns) = split_system(request);

    let mut contents: Vec<Content> = turns
        .iter()
        .map(|m| Content {
            role: wire_role(m.role).to_string(),
            parts: vec![Part {
                text: m.content.clone(),
            }],
        })
        .collect();

    if let Some(system) = system {
        match contents.iter_mut().find(|c| c.role == "user") {
            Some(first_user) => {
                let text = &mut first_user.parts[0].text;
                *text = format!("{system}\n\n{text}");
            }
            None => contents.insert(
                0,
                Content {
                    role: "user".to_string(),
                    parts: vec![Part { text: system }],
                },
            ),
        }
    }

    GeminiRequest {
        contents,
        generation_config: GenerationConfig {
            temperature: request.settings.temperature,
            top_p: request.settings.top_p,
            max_output_tokens: request.settings.max_tokens,
        },
    }
}

// Response types

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    pub candidates: Vec<Candidate>,
    #[serde(rename = "usageMetadata", default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Content,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsageMetadata {
    #[serde(rename = "promptTokenCount", default)]
    pub prompt_token_count: Option<u32>,
    #[serde(rename = "candidatesTokenCount", default)]
    pub candidates_token_count: Option<u32>,
}

/// Parse an answer into the unified shape
pub fn parse_response(value: Value, model: &str, latency: Duration) -> Result<ChatResponse> {
    let response: GeminiResponse = serde_json::from_value(value)
        .map_err(|e| Error::invalid_response(PROVIDER_ID, e.to_string()))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_response(PROVIDER_ID, "response has no candidates"))?;

    let content = candidate
        .content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("");

    let (input_tokens, output_tokens) = match response.usage_metadata {
        Some(usage) => (usage.prompt_token_count, usage.candidates_token_count),
        None => (None, None),
    };

    Ok(ChatResponse {
        content,
        input_tokens,
        output_tokens,
        latency,
        model: model.to_string(),
        provider: PROVIDER_ID.to_string(),
        finish_reason: candidate.finish_reason.as_deref().and_then(parse_finish_reason),
    })
}

pub fn parse_finish_reason(reason: &str) -> Option<FinishReason> {
    match reason {
        "STOP" => Some(FinishReason::Stop),
        "MAX_TOKENS" => Some(FinishReason::Length),
        "SAFETY" => Some(FinishReason::ContentFilter),
        _ => None,
    }
}
