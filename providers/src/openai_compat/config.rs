//! Presets for the OpenAI-compatible REST family

use crate::constants::{
    keys, GROQ_DEFAULT_BASE_URL, GROQ_DEFAULT_MODEL, MISTRAL_DEFAULT_BASE_URL,
    MISTRAL_DEFAULT_MODEL, OPENAI_DEFAULT_BASE_URL, OPENAI_DEFAULT_MODEL,
};

/// A vendor speaking the OpenAI chat-completions dialect
///
/// The wire protocol is identical across the family; a preset only pins the
/// identity, endpoint, credential key, and model catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// api.openai.com
    OpenAi,
    /// api.groq.com
    Groq,
    /// api.mistral.ai
    Mistral,
}

impl Preset {
    /// Stable adapter id
    pub fn id(self) -> &'static str {
        match self {
            Preset::OpenAi => "openai",
            Preset::Groq => "groq",
            Preset::Mistral => "mistral",
        }
    }

    /// Human-readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Preset::OpenAi => "OpenAI",
            Preset::Groq => "Groq",
            Preset::Mistral => "Mistral",
        }
    }

    /// Default endpoint
    pub fn base_url(self) -> &'static str {
        match self {
            Preset::OpenAi => OPENAI_DEFAULT_BASE_URL,
            Preset::Groq => GROQ_DEFAULT_BASE_URL,
            Preset::Mistral => MISTRAL_DEFAULT_BASE_URL,
        }
    }

    /// Secret-store key holding the bearer token
    pub fn api_key_name(self) -> &'static str {
        match self {
            Preset::OpenAi => keys::OPENAI_API_KEY,
            Preset::Groq => keys::GROQ_API_KEY,
            Preset::Mistral => keys::MISTRAL_API_KEY,
        }
    }

    /// Secret-store key for an endpoint override
    pub fn base_url_name(self) -> &'static str {
        match self {
            Preset::OpenAi => keys::OPENAI_BASE_URL,
            Preset::Groq => keys::GROQ_BASE_URL,
            Preset::Mistral => keys::MISTRAL_BASE_URL,
        }
    }

    /// Model used when settings carry none
    pub fn default_model(self) -> &'static str {
        match self {
            Preset::OpenAi => OPENAI_DEFAULT_MODEL,
            Preset::Groq => GROQ_DEFAULT_MODEL,
            Preset::Mistral => MISTRAL_DEFAULT_MODEL,
        }
    }

    /// Built-in model identifiers
    pub fn models(self) -> Vec<String> {
        let names: &[&str] = match self {
            Preset::OpenAi => &["gpt-4o", "gpt-4o-mini", "o1-mini"],
            Preset::Groq => &["llama-3.3-70b-versatile", "llama-3.1-8b-instant"],
            Preset::Mistral => &["mistral-large-latest", "mistral-small-latest"],
        };
        names.iter().map(|n| (*n).to_string()).collect()
    }

    /// Whether the vendor accepts image input on this endpoint
    pub fn supports_vision(self) -> bool {
        matches!(self, Preset::OpenAi)
    }
}
