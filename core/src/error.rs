//! The unified error taxonomy
//!
//! Every backend-specific failure is normalized into exactly one of these
//! kinds at the adapter boundary. Layers above (registry, orchestrator)
//! propagate them untouched; nothing re-wraps.

use thiserror::Error;

/// Boxed error type for sources
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias using the unified error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to a backend
#[derive(Debug, Error)]
pub enum Error {
    /// A required credential is absent or empty; detected before any network
    /// traffic is attempted
    #[error("missing credential `{key}` for provider `{provider}`")]
    MissingCredential {
        /// Adapter id
        provider: String,
        /// Secret-store key that came back empty
        key: String,
    },

    /// The backend answered, but not in a shape this adapter understands
    #[error("invalid response from `{provider}`: {message}")]
    InvalidResponse {
        /// Adapter id
        provider: String,
        /// What was malformed
        message: String,
    },

    /// Transport-level failure: DNS, connect, TLS, mid-body disconnect
    #[error("network failure: {message}")]
    Network {
        /// Human-readable description, possibly with a local-daemon hint
        message: String,
        /// Underlying transport error, when one exists
        #[source]
        source: Option<BoxError>,
    },

    /// The backend asked us to slow down
    #[error("rate limited{}", .retry_after.map_or_else(String::new, |s| format!(", retry after {s}s")))]
    RateLimited {
        /// Parsed Retry-After seconds, when the backend sent one
        retry_after: Option<u64>,
    },

    /// The requested model does not exist or is not accessible
    #[error("model `{model}` is not available")]
    ModelUnavailable {
        /// Model identifier that was rejected
        model: String,
    },

    /// A capability was requested that the backend's descriptor denies
    #[error("provider `{provider}` does not support {feature}")]
    Unsupported {
        /// Adapter id
        provider: String,
        /// The denied capability
        feature: String,
    },

    /// Any other non-success answer from the backend
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Body-derived description
        message: String,
    },
}

impl Error {
    /// A credential lookup came back absent or empty
    pub fn missing_credential(provider: impl Into<String>, key: impl Into<String>) -> Self {
        Error::MissingCredential {
            provider: provider.into(),
            key: key.into(),
        }
    }

    /// The backend's answer could not be interpreted
    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Transport failure without a structured source
    pub fn network(message: impl Into<String>) -> Self {
        Error::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Transport failure wrapping the underlying error
    pub fn network_with_source(message: impl Into<String>, source: BoxError) -> Self {
        Error::Network {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Non-success status that maps to no more specific kind
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Error::Server {
            status,
            message: message.into(),
        }
    }

    /// Whether retrying the same call later could reasonably succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network { .. } | Error::RateLimited { .. } => true,
            Error::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
