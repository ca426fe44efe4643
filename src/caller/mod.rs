//! Single-shot function calling: prompt, extract, retry, dispatch.

pub mod prompt;

use std::sync::Arc;

use tracing::{error, info};

use crate::error::{NatfnError, Result};
use crate::extract::{CallEncoding, CallExtractor, ParsedCall};
use crate::provider::{ModelProvider, ProviderRequest};
use crate::tools::{FunctionDescriptor, ToolRegistry};
use crate::types::{GenerationSettings, ModelMessage};
use crate::util::retry::RetryPolicy;

pub use prompt::function_system_prompt;

/// Drives a model until it produces one decodable function call.
///
/// Every attempt sends the same fresh `[system, user]` exchange; failed
/// replies are not carried into the next attempt.
pub struct FunctionCaller {
    provider: Arc<dyn ModelProvider>,
    extractor: Box<dyn CallExtractor>,
    retry: RetryPolicy,
    settings: GenerationSettings,
}

impl FunctionCaller {
    /// Create a caller whose extraction strategy follows the model's capabilities.
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        let extractor = CallEncoding::for_capabilities(provider.capabilities()).extractor();
        Self {
            provider,
            extractor,
            retry: RetryPolicy::default(),
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: Box<dyn CallExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn encoding(&self) -> CallEncoding {
        self.extractor.encoding()
    }

    /// Ask the model for a call until one is extracted or the retry policy
    /// runs out.
    ///
    /// Provider errors are returned as-is; only extraction failures are
    /// retried.
    pub async fn get_function_call(
        &self,
        user_text: &str,
        descriptors: &[FunctionDescriptor],
    ) -> Result<ParsedCall> {
        info!(input = %user_text, "user input");

        let system_prompt = function_system_prompt(descriptors)?;
        let max_attempts = self.retry.effective_attempts();

        for attempt in 1..=max_attempts {
            self.retry.wait_before(attempt).await;

            let mut request = ProviderRequest::new(
                vec![
                    ModelMessage::system(system_prompt.clone()),
                    ModelMessage::user(user_text),
                ],
                self.settings.clone(),
            );
            if self.extractor.encoding() == CallEncoding::Native {
                request = request.with_tools(descriptors.to_vec());
            }

            info!(attempt, max_attempts, model = self.provider.model_id(), "requesting function call");
            let response = self.provider.generate_text(&request).await?;

            match self.extractor.extract(&response) {
                Ok(calls) => {
                    if let Some(call) = calls.into_iter().next() {
                        info!(attempt, name = %call.name, arguments = ?call.arguments, "function call");
                        return Ok(call);
                    }
                    error!(attempt, "failed to parse function call");
                }
                Err(e) => error!(attempt, error = %e, "failed to parse function call"),
            }

            if attempt < max_attempts {
                info!(retry = attempt, "retrying");
            }
        }

        Err(NatfnError::RetryExhausted {
            attempts: max_attempts,
        })
    }

    /// Extract a call for `user_text` against `registry` and execute it.
    pub async fn call(&self, user_text: &str, registry: &ToolRegistry) -> Result<serde_json::Value> {
        let call = self
            .get_function_call(user_text, &registry.describe_all())
            .await?;
        let result = registry.invoke(&call).await?;
        info!(result = %result, "result");
        Ok(result)
    }
}
