//! Model provider trait and the Ollama implementation.

pub mod format;
pub mod http;
pub mod ollama;

use async_trait::async_trait;

use crate::error::NatfnError;
use crate::models::ModelCapabilities;
use crate::tools::FunctionDescriptor;
use crate::types::{FinishReason, GenerationSettings, ModelMessage, ToolCallRequest, Usage};

pub use ollama::OllamaProvider;

/// A request sent to a model provider.
#[derive(Debug, Clone, Default)]
pub struct ProviderRequest {
    pub messages: Vec<ModelMessage>,
    pub settings: GenerationSettings,
    /// Descriptors offered through the runtime's native tool-call interface.
    pub tools: Option<Vec<FunctionDescriptor>>,
}

impl ProviderRequest {
    pub fn new(messages: Vec<ModelMessage>, settings: GenerationSettings) -> Self {
        Self {
            messages,
            settings,
            tools: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<FunctionDescriptor>) -> Self {
        self.tools = (!tools.is_empty()).then_some(tools);
        self
    }
}

/// Response from a provider: the raw model output of one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderResponse {
    pub text: String,
    pub usage: Usage,
    pub tool_calls: Vec<ToolCallRequest>,
    pub finish_reason: Option<FinishReason>,
}

impl ProviderResponse {
    /// A plain text response.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: Some(FinishReason::Stop),
            ..Default::default()
        }
    }
}

/// Core trait implemented by model backends.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider name (e.g., "ollama").
    fn provider_name(&self) -> &str;

    /// The model ID this provider instance serves.
    fn model_id(&self) -> &str;

    /// Capabilities of the model.
    fn capabilities(&self) -> &ModelCapabilities;

    /// Turn a list of messages into one completion.
    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, NatfnError>;
}
