//! Agent that keeps a transcript and executes the tool calls the model asks for.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::caller::function_system_prompt;
use crate::error::Result;
use crate::extract::{CallEncoding, CallExtractor};
use crate::provider::format::tool_result_to_string;
use crate::provider::{ModelProvider, ProviderRequest};
use crate::tools::ToolRegistry;
use crate::types::*;

use super::transcript::Transcript;

/// A conversational agent over one transcript.
///
/// Each [`Agent::chat`] turn makes one model call, or two when the model
/// requests tools: the calls run in the order listed, their results are
/// appended as tool messages, and a follow-up call without tool
/// descriptors produces the answer.
pub struct Agent {
    provider: Arc<dyn ModelProvider>,
    registry: Arc<ToolRegistry>,
    extractor: Box<dyn CallExtractor>,
    system_prompt: Option<String>,
    settings: GenerationSettings,
    transcript: Transcript,
    usage: Usage,
}

impl Agent {
    /// Create an agent whose extraction strategy follows the model's capabilities.
    pub fn new(provider: Arc<dyn ModelProvider>, registry: Arc<ToolRegistry>) -> Self {
        let extractor = CallEncoding::for_capabilities(provider.capabilities()).extractor();
        Self {
            provider,
            registry,
            extractor,
            system_prompt: None,
            settings: GenerationSettings::default(),
            transcript: Transcript::new(),
            usage: Usage::default(),
        }
    }

    /// Set system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Set generation settings.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn CallExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Send a user message and return the final answer for this turn.
    ///
    /// A failed turn leaves the transcript as it was before the call.
    pub async fn chat(&mut self, message: impl Into<String>) -> Result<String> {
        let mark = self.transcript.len();
        let result = self.run_turn(message.into()).await;
        if result.is_err() {
            self.transcript.truncate(mark);
        }
        result
    }

    async fn run_turn(&mut self, message: String) -> Result<String> {
        self.transcript.add_user_message(message);

        let mut request = ProviderRequest::new(self.request_messages(true)?, self.settings.clone());
        if self.extractor.encoding() == CallEncoding::Native {
            request = request.with_tools(self.registry.describe_all());
        }

        let response = self.provider.generate_text(&request).await?;
        self.usage.merge(&response.usage);

        let calls = self.extractor.extract(&response)?;
        // Text-encoded calls carry no id; give each one so results can point back at it.
        let requests: Vec<ToolCallRequest> = calls
            .iter()
            .map(|call| ToolCallRequest {
                id: call.id.clone().unwrap_or_else(ToolCallRequest::new_id),
                name: call.name.clone(),
                arguments: Value::Object(call.arguments.clone()),
            })
            .collect();
        self.transcript.add_message(ModelMessage::assistant_with_tool_calls(
            response.text.clone(),
            &requests,
        ));

        if calls.is_empty() {
            return Ok(response.text);
        }

        info!(count = calls.len(), "executing tool calls");
        for (call, request) in calls.iter().zip(&requests) {
            let result = self.registry.invoke(call).await?;
            debug!(tool = %call.name, id = %request.id, "appending tool result");
            self.transcript.add_message(ModelMessage::tool_result(
                request.id.clone(),
                call.name.clone(),
                tool_result_to_string(&result),
            ));
        }

        let request = ProviderRequest::new(self.request_messages(false)?, self.settings.clone());
        let follow_up = self.provider.generate_text(&request).await?;
        self.usage.merge(&follow_up.usage);
        if !follow_up.tool_calls.is_empty() {
            warn!(
                count = follow_up.tool_calls.len(),
                "ignoring tool calls in follow-up response"
            );
        }
        self.transcript.add_message(ModelMessage::assistant(follow_up.text.clone()));
        debug!(
            input_tokens = self.usage.input_tokens,
            output_tokens = self.usage.output_tokens,
            "conversation usage"
        );

        Ok(follow_up.text)
    }

    /// Discard the conversation history and usage totals.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.usage = Usage::default();
    }

    /// Tokens used by every model call since creation or the last reset.
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    /// Get the conversation history.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn encoding(&self) -> CallEncoding {
        self.extractor.encoding()
    }

    // Text-encoded models only learn about tools through the system prompt.
    fn request_messages(&self, offer_tools: bool) -> Result<Vec<ModelMessage>> {
        let functions = if offer_tools && self.extractor.encoding() == CallEncoding::EmbeddedText {
            Some(function_system_prompt(&self.registry.describe_all())?)
        } else {
            None
        };

        let system = match (self.system_prompt.as_deref(), functions) {
            (Some(sys), Some(functions)) => Some(format!("{sys}\n\n{functions}")),
            (Some(sys), None) => Some(sys.to_string()),
            (None, functions) => functions,
        };

        let mut messages = Vec::with_capacity(self.transcript.len() + 1);
        if let Some(system) = system {
            messages.push(ModelMessage::system(system));
        }
        messages.extend(self.transcript.messages().iter().cloned());
        Ok(messages)
    }
}
