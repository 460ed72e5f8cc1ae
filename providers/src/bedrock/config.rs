//! Bedrock adapter configuration

use crate::constants::{BEDROCK_DEFAULT_MODEL, BEDROCK_DEFAULT_REGION};

/// Configuration for the Bedrock adapter
///
/// The signing key pair is not part of the config; it is resolved from the
/// secret store on every call.
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    /// AWS region the runtime endpoint lives in
    pub region: String,
    /// Model used when settings carry none
    pub default_model: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: BEDROCK_DEFAULT_REGION.to_string(),
            default_model: BEDROCK_DEFAULT_MODEL.to_string(),
        }
    }
}
