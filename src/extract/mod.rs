//! Function-call extraction from model output.
//!
//! Two strategies sit behind [`CallExtractor`]:
//! - [`EmbeddedTextExtractor`] finds a `"name": "...", "arguments": '{...}'`
//!   fragment inside free text.
//! - [`NativeToolCallExtractor`] reads the runtime's structured tool calls.
//!
//! [`CallEncoding`] selects between them from the model's capabilities.

pub mod native;
pub mod text;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

use crate::error::Result;
use crate::models::ModelCapabilities;
use crate::provider::ProviderResponse;

pub use native::NativeToolCallExtractor;
pub use text::{parse_function_call, EmbeddedTextExtractor};

/// A decoded call, not yet validated against the tool's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCall {
    /// Correlation id from the runtime; `None` for text-encoded calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ParsedCall {
    pub fn new(name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// How a model backend encodes the calls it wants made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CallEncoding {
    /// Calls are written into the completion text.
    EmbeddedText,
    /// Calls arrive in the runtime's structured tool-call fields.
    Native,
}

impl CallEncoding {
    pub fn for_capabilities(capabilities: &ModelCapabilities) -> Self {
        if capabilities.supports_tools {
            Self::Native
        } else {
            Self::EmbeddedText
        }
    }

    /// The extractor for this encoding.
    pub fn extractor(self) -> Box<dyn CallExtractor> {
        match self {
            Self::EmbeddedText => Box::new(EmbeddedTextExtractor),
            Self::Native => Box::new(NativeToolCallExtractor),
        }
    }
}

/// Boxed extractor for `encoding`.
pub fn extractor_for(encoding: CallEncoding) -> Box<dyn CallExtractor> {
    encoding.extractor()
}

/// Recovers the calls a model response asks for.
pub trait CallExtractor: Send + Sync {
    fn encoding(&self) -> CallEncoding;

    /// Calls in the order the model listed them. An empty list means the
    /// response asked for nothing; `Err` means it asked but the request
    /// could not be decoded.
    fn extract(&self, response: &ProviderResponse) -> Result<Vec<ParsedCall>>;
}
