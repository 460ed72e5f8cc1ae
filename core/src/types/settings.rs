//! Per-backend generation settings

use serde::{Deserialize, Serialize};

/// Generation settings for the active backend
///
/// Exactly one live instance exists per active backend; the registry owns it
/// and snapshots it when the active backend changes. Every adapter supplies
/// its own defaults, so `Default` here is only the neutral starting point for
/// backends without an opinion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model identifier sent to the backend
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Top-p nucleus sampling
    pub top_p: f32,
    /// System prompt prepended to every request
    pub system_prompt: String,
    /// Whether to stream responses incrementally
    pub use_streaming: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 1.0,
            max_tokens: 4096,
            top_p: 1.0,
            system_prompt: String::new(),
            use_streaming: true,
        }
    }
}

impl ModelSettings {
    /// Neutral defaults for a given model
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }
}
