//! Backend adapters for the Switchboard gateway
//!
//! One flat adapter per backend family: Anthropic-style REST with SSE
//! streaming, the Ollama local daemon with NDJSON streaming, SigV4-signed
//! Bedrock with binary event-stream framing, the OpenAI-compatible REST
//! family, and Gemini. The three wire decoders and the request signer are
//! plain synchronous state machines under [`decode`] and [`sign`]; all HTTP
//! goes through the [`http::HttpClient`] seam so adapters stay testable
//! without a network.

pub mod constants;
pub mod decode;
pub mod error;
pub mod http;
pub mod sign;
#[cfg(test)]
pub(crate) mod testing;
mod util;

// Adapter implementations
pub mod anthropic;
pub mod bedrock;
pub mod gemini;
pub mod ollama;
pub mod openai_compat;

// Re-export adapter types
pub use anthropic::Anthropic;
pub use bedrock::Bedrock;
pub use gemini::Gemini;
pub use ollama::Ollama;
pub use openai_compat::{OpenAiCompatible, Preset};
