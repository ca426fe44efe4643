//! Model capabilities descriptor.

use serde::{Deserialize, Serialize};

/// Describes what a model can do.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelCapabilities {
    /// The runtime returns structured tool calls for this model.
    pub supports_tools: bool,
}

impl ModelCapabilities {
    /// Capabilities of a model with native tool calling.
    pub fn with_tools() -> Self {
        Self {
            supports_tools: true,
        }
    }
}
