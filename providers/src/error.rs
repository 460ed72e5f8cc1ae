//! Error normalization shared by every adapter
//!
//! HTTP status, Retry-After, and body text turn into exactly one taxonomy
//! kind here, at the adapter boundary. Callers further up never reinterpret
//! backend detail.

use reqwest::StatusCode;
use switchboard_core::Error;

/// Convert transport errors to the unified network kind
pub fn network_error(error: reqwest::Error) -> Error {
    Error::Network {
        message: error.to_string(),
        source: Some(Box::new(error)),
    }
}

/// Classify a non-success HTTP answer
///
/// 429 becomes `RateLimited` with the parsed Retry-After value; everything
/// else is `Server`. 404s are re-mapped to `ModelUnavailable` by the adapter
/// that knows which model it asked for, see [`model_not_found`].
pub fn classify_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> Error {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Error::RateLimited { retry_after };
    }
    Error::Server {
        status: status.as_u16(),
        message: extract_error_message(body),
    }
}

/// Re-map a 404 answer to `ModelUnavailable` for the model that was requested
pub fn model_not_found(error: Error, model: &str) -> Error {
    match error {
        Error::Server { status: 404, .. } => Error::ModelUnavailable {
            model: model.to_string(),
        },
        other => other,
    }
}

/// Parse a Retry-After header value as whole seconds
///
/// The HTTP-date form is rare on these APIs and is treated as absent.
pub fn parse_retry_after(value: Option<&reqwest::header::HeaderValue>) -> Option<u64> {
    value?.to_str().ok()?.trim().parse().ok()
}

/// Pull a human-readable message out of an error body
///
/// Understands the `{"error": {"message": ...}}`, `{"error": "..."}`, and
/// `{"message": "..."}` shapes; falls back to the truncated raw body.
pub fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
        {
            return message.to_string();
        }
        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return message.to_string();
        }
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.chars().count() > 200 {
        let cut: String = trimmed.chars().take(200).collect();
        format!("{cut}…")
    } else {
        trimmed.to_string()
    }
}
