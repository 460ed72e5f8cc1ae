//! Ollama adapter configuration

use crate::constants::{OLLAMA_DEFAULT_BASE_URL, OLLAMA_DEFAULT_MODEL};

/// Configuration for the Ollama adapter
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the local daemon
    pub base_url: String,
    /// Model used when settings carry none
    pub default_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: OLLAMA_DEFAULT_BASE_URL.to_string(),
            default_model: OLLAMA_DEFAULT_MODEL.to_string(),
        }
    }
}
