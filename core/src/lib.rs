//! Core traits and types for the Switchboard AI gateway
//!
//! This crate defines the uniform contract every backend adapter implements:
//! the [`Provider`] trait, the chat data model, the streaming chunk sum type,
//! the closed error taxonomy, and the [`SecretStore`] contract through which
//! credentials are resolved. It knows nothing about HTTP or any concrete
//! backend.

pub mod error;
pub mod provider;
pub mod secrets;
pub mod types;

// Re-export commonly used items
pub use error::{BoxError, Error, Result};
pub use provider::{single_yield, ChunkStream, Provider};
pub use secrets::{EnvStore, MemoryStore, SecretStore};
pub use types::{
    chunk::{StreamAccumulator, StreamChunk},
    info::ProviderInfo,
    message::{Message, Role},
    request::{ChatRequest, ChatRequestBuilder},
    response::{ChatResponse, FinishReason},
    settings::ModelSettings,
};
