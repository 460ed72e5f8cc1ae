//! Anthropic adapter configuration

use crate::constants::{ANTHROPIC_DEFAULT_BASE_URL, ANTHROPIC_DEFAULT_MODEL};

/// Configuration for the Anthropic adapter
///
/// The API key is not part of the config; it is resolved from the secret
/// store on every call so credential edits take effect immediately.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Model used when settings carry none
    pub default_model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: ANTHROPIC_DEFAULT_BASE_URL.to_string(),
            default_model: ANTHROPIC_DEFAULT_MODEL.to_string(),
        }
    }
}
