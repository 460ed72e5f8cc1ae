//! Static backend capability descriptors

/// Capabilities a backend advertises
///
/// The descriptor is immutable for the adapter's lifetime. Backends with a
/// dynamic model catalog (the local daemon) expose it through
/// `Provider::list_models`; the refreshed list lives in the registry cache,
/// never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    /// Stable identifier, unique within a registry
    pub id: String,
    /// Human-readable name
    pub display_name: String,
    /// Whether the backend accepts image input
    pub supports_vision: bool,
    /// Whether the backend can stream responses incrementally
    pub supports_streaming: bool,
    /// Whether the backend supports tool/function calling
    pub supports_tools: bool,
    /// Built-in model identifiers
    pub models: Vec<String>,
}

impl ProviderInfo {
    /// Descriptor with every capability flag off and no models
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            supports_vision: false,
            supports_streaming: false,
            supports_tools: false,
            models: Vec::new(),
        }
    }
}
