//! Convenience re-exports for common use.

pub use crate::agent::Agent;
pub use crate::caller::FunctionCaller;
pub use crate::config::{ExtractionMode, NatfnConfig};
pub use crate::error::{NatfnError, Result};
pub use crate::extract::{CallEncoding, CallExtractor, ParsedCall};
pub use crate::models::{ModelCapabilities, OllamaModel};
pub use crate::provider::{ModelProvider, OllamaProvider, ProviderRequest, ProviderResponse};
pub use crate::tools::{FunctionDescriptor, ItemStore, Tool, ToolArguments, ToolRegistry, ToolSchema};
pub use crate::types::{ContentPart, FinishReason, GenerationSettings, ModelMessage, Role, Usage};
pub use crate::util::retry::RetryPolicy;
