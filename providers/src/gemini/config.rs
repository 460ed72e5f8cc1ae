//! Gemini adapter configuration

use crate::constants::{GEMINI_DEFAULT_BASE_URL, GEMINI_DEFAULT_MODEL};

/// Configuration for the Gemini adapter
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Model used when settings carry none
    pub default_model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            default_model: GEMINI_DEFAULT_MODEL.to_string(),
        }
    }
}
