//! Response types for chat calls

use std::fmt;
use std::time::Duration;

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// Natural end of message
    Stop,
    /// Hit the max_tokens limit
    Length,
    /// Content was filtered
    ContentFilter,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishReason::Stop => write!(f, "stop"),
            FinishReason::Length => write!(f, "length"),
            FinishReason::ContentFilter => write!(f, "content_filter"),
        }
    }
}

/// A complete response in the unified shape
///
/// `latency` is always measured on this side of the wire; backend-reported
/// durations are never copied into it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// The generated text
    pub content: String,
    /// Prompt tokens, when the backend reports them
    pub input_tokens: Option<u32>,
    /// Completion tokens, when the backend reports them
    pub output_tokens: Option<u32>,
    /// Wall-clock time for the round trip, measured locally
    pub latency: Duration,
    /// Model that produced the response
    pub model: String,
    /// Id of the adapter that produced the response
    pub provider: String,
    /// Why generation stopped, when reported
    pub finish_reason: Option<FinishReason>,
}

impl ChatResponse {
    /// Response with only text filled in; the rest defaults to unknown
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            input_tokens: None,
            output_tokens: None,
            latency: Duration::ZERO,
            model: String::new(),
            provider: String::new(),
            finish_reason: None,
        }
    }
}

impl fmt::Display for ChatResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_reason_display() {
        assert_eq!(FinishReason::Stop.to_string(), "stop");
        assert_eq!(FinishReason::Length.to_string(), "length");
        assert_eq!(FinishReason::ContentFilter.to_string(), "content_filter");
    }

    #[test]
    fn display_is_the_content() {
        let response = ChatResponse::text("hello");
        assert_eq!(response.to_string(), "hello");
    }
}
