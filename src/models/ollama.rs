//! Ollama local model definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::capabilities::ModelCapabilities;

/// Models served by a local Ollama runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
pub enum OllamaModel {
    /// Mistral fine-tune that writes calls as `<functioncall>` text.
    #[strum(serialize = "calebfahlgren/natural-functions")]
    NaturalFunctions,
    #[strum(serialize = "llama3.1")]
    Llama31,
    #[strum(serialize = "llama3.2")]
    Llama32,
    #[strum(serialize = "mistral")]
    Mistral,
    #[strum(serialize = "qwen2.5")]
    Qwen25,
    #[strum(default)]
    Custom(String),
}

impl OllamaModel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::NaturalFunctions => "calebfahlgren/natural-functions",
            Self::Llama31 => "llama3.1",
            Self::Llama32 => "llama3.2",
            Self::Mistral => "mistral",
            Self::Qwen25 => "qwen2.5",
            Self::Custom(s) => s,
        }
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        match self {
            // Writes calls as `<functioncall>` text.
            Self::NaturalFunctions | Self::Custom(_) => ModelCapabilities::default(),
            Self::Mistral | Self::Llama31 | Self::Llama32 | Self::Qwen25 => {
                ModelCapabilities::with_tools()
            }
        }
    }
}
