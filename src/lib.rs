//! Switchboard - a unified gateway over multiple AI inference backends
//!
//! One capability-polymorphic contract covers every backend: direct REST
//! with SSE streaming (Anthropic), a local daemon speaking NDJSON (Ollama),
//! a SigV4-signed cloud endpoint with binary event-stream framing (Bedrock),
//! and the plain-JSON REST family (OpenAI-compatible vendors, Gemini).
//! Callers send a message, stream incremental text, read token usage, cancel
//! cleanly, and fall back to single-shot responses without caring which
//! backend is active.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use switchboard::prelude::*;
//! use switchboard::providers::{http::ReqwestClient, Ollama};
//!
//! # #[tokio::main]
//! # async fn main() -> switchboard::Result<()> {
//! let http: Arc<dyn switchboard::providers::http::HttpClient> =
//!     Arc::new(ReqwestClient::new()?);
//! let secrets = Arc::new(EnvStore::new());
//!
//! let registry = Arc::new(ProviderRegistry::new("ollama"));
//! registry.register(Arc::new(Ollama::new(http, secrets)));
//!
//! let client = Client::new(registry);
//! let outcome = client.stream("Hello!", &[]).await?.finish().await;
//! println!("{}", outcome.text);
//! # Ok(())
//! # }
//! ```

// Re-export core types
pub use switchboard_core::*;

/// Backend adapters, frame decoders, and request signing
pub mod providers {
    pub use switchboard_providers::*;
}

/// Adapter registry and active-backend state
pub mod registry {
    pub use switchboard_registry::*;
}

/// Streaming orchestrator and multi-backend compare
pub mod client {
    pub use switchboard_client::*;
}

/// Commonly used types, importable in one line
pub mod prelude {
    pub use crate::client::{Client, Turn, TurnOutcome, TurnPhase};
    pub use crate::registry::ProviderRegistry;
    pub use switchboard_core::{
        ChatRequest, ChatResponse, ChunkStream, EnvStore, Error, MemoryStore, Message,
        ModelSettings, Provider, ProviderInfo, Result, Role, SecretStore, StreamAccumulator,
        StreamChunk,
    };
}
