//! Wire shapes for the Ollama chat API

use crate::ollama::PROVIDER_ID;
use crate::util::split_system;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use switchboard_core::{ChatRequest, ChatResponse, Error, FinishReason, Result};

// Request types

#[derive(Debug, Serialize)]
pub struct OllamaRequest {
    pub model: String,
    pub messages: Vec<OllamaMessage>,
    pub stream: bool,
    pub options: OllamaOptions,
}

#[derive(Debug, Serialize)]
pub struct OllamaMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct OllamaOptions {
    pub temperature: f32,
    pub top_p: f32,
    /// Ollama's name for the generation cap
    pub num_predict: u32,
}

/// Build the request body; the system prompt becomes a leading system turn
pub fn build_request(request: &ChatRequest, stream: bool) -> OllamaRequest {
    let (system, turns) = split_system(request);

    let mut messages = Vec::with_capacity(turns.len() + 1);
    if let Some(system) = system {
        messages.push(OllamaMessage {
            role: "system".to_string(),
            content: system,
        });
    }
    messages.extend(turns.iter().map(|m| OllamaMessage {
        role: m.role.as_str().to_string(),
        content: m.content.clone(),
    }));

    OllamaRequest {
        model: request.settings.model.clone(),
        messages,
        stream,
        options: OllamaOptions {
            temperature: request.settings.temperature,
            top_p: request.settings.top_p,
            num_predict: request.settings.max_tokens,
        },
    }
}

// Response types, shared by the single-shot answer and each stream line

#[derive(Debug, Deserialize)]
pub struct OllamaChunk {
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub message: Option<OllamaChunkMessage>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub eval_count: Option<u32>,
    #[serde(default)]
    pub prompt_eval_count: Option<u32>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OllamaChunkMessage {
    #[serde(default)]
    pub content: String,
}

/// Parse a non-streaming answer into the unified shape
pub fn parse_response(value: Value, latency: Duration) -> Result<ChatResponse> {
    let chunk: OllamaChunk = serde_json::from_value(value)
        .map_err(|e| Error::invalid_response(PROVIDER_ID, e.to_string()))?;

    if let Some(error) = chunk.error {
        return Err(Error::server(500, error));
    }

    let message = chunk
        .message
        .ok_or_else(|| Error::invalid_response(PROVIDER_ID, "response has no message"))?;

    Ok(ChatResponse {
        content: message.content,
        input_tokens: chunk.prompt_eval_count,
        output_tokens: chunk.eval_count,
        latency,
        model: chunk.model,
        provider: PROVIDER_ID.to_string(),
        finish_reason: chunk.done_reason.as_deref().and_then(parse_done_reason),
    })
}

pub fn parse_done_reason(reason: &str) -> Option<FinishReason> {
    match reason {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        _ => None,
    }
}

/// Pull model names out of a tags listing
pub fn parse_tags(value: Value) -> Result<Vec<String>> {
    let models = value
        .get("models")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::invalid_response(PROVIDER_ID, "tags listing has no models array"))?;

    Ok(models
        .iter()
        .filter_map(|m| m.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use switchboard_core::{Message, ModelSettings};

    #[test]
    fn system_prompt_becomes_leading_turn() {
        let mut settings = ModelSettings::for_model("llama3.2");
        settings.system_prompt = "short answers".to_string();
        settings.max_tokens = 2048;
        let request = ChatRequest::new(vec![Message::user("hi")], settings);

        let body = build_request(&request, true);
        assert_eq!(body.messages.len(), 2);
        assert_eq!(body.messages[0].role, "system");
        assert_eq!(body.messages[0].content, "short answers");
        assert_eq!(body.messages[1].role, "user");
        assert_eq!(body.options.num_predict, 2048);
        assert!(body.stream);
    }

    #[test]
    fn single_shot_answer_parses_counts() {
        let value = json!({
            "model": "llama3.2",
            "message": {"role": "assistant", "content": "hey"},
            "done": true,
            "done_reason": "stop",
            "prompt_eval_count": 11,
            "eval_count": 6
        });

        let response = parse_response(value, Duration::from_millis(3)).unwrap();
        assert_eq!(response.content, "hey");
        assert_eq!(response.input_tokens, Some(11));
        assert_eq!(response.output_tokens, Some(6));
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn daemon_error_field_is_a_server_error() {
        let value = json!({"error": "model failed to load"});
        let err = parse_response(value, Duration::ZERO).unwrap_err();
        assert!(matches!(err, Error::Server { status: 500, message } if message.contains("load")));
    }

    #[test]
    fn tags_listing_yields_names() {
        let value = json!({
            "models": [
                {"name": "llama3.2:latest", "size": 1},
                {"name": "qwen2.5:7b", "size": 2}
            ]
        });
        assert_eq!(
            parse_tags(value).unwrap(),
            vec!["llama3.2:latest".to_string(), "qwen2.5:7b".to_string()]
        );
    }

    #[test]
    fn tags_without_models_is_invalid() {
        assert!(parse_tags(json!({"wrong": []})).is_err());
    }
}
