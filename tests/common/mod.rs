//! Shared test helpers and a scripted mock provider.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use natfn::error::NatfnError;
use natfn::models::ModelCapabilities;
use natfn::provider::{ModelProvider, ProviderRequest, ProviderResponse};
use natfn::types::*;

/// A provider that replays queued responses and records every request.
pub struct MockProvider {
    model_id: String,
    capabilities: ModelCapabilities,
    responses: Mutex<VecDeque<ProviderResponse>>,
    requests: Mutex<Vec<ProviderRequest>>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// A model that writes its calls into the completion text.
    pub fn text_model() -> Self {
        Self::with_capabilities(ModelCapabilities::default())
    }

    /// A model whose runtime returns structured tool calls.
    pub fn native_model() -> Self {
        Self::with_capabilities(ModelCapabilities::with_tools())
    }

    pub fn with_capabilities(capabilities: ModelCapabilities) -> Self {
        Self {
            model_id: "mock-model".to_string(),
            capabilities,
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a text response.
    pub fn queue_response(&self, text: &str) {
        self.responses.lock().unwrap().push_back(ProviderResponse {
            text: text.to_string(),
            usage: Usage::new(10, 20),
            tool_calls: vec![],
            finish_reason: Some(FinishReason::Stop),
        });
    }

    /// Queue a response carrying structured tool calls `(id, name, arguments)`.
    pub fn queue_tool_calls(&self, calls: &[(&str, &str, serde_json::Value)]) {
        self.responses.lock().unwrap().push_back(ProviderResponse {
            text: String::new(),
            usage: Usage::new(10, 5),
            tool_calls: calls
                .iter()
                .map(|(id, name, arguments)| ToolCallRequest {
                    id: id.to_string(),
                    name: name.to_string(),
                    arguments: arguments.clone(),
                })
                .collect(),
            finish_reason: Some(FinishReason::ToolCalls),
        });
    }

    /// Number of `generate_text` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, NatfnError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| NatfnError::api(500, "no scripted response left"))
    }
}

/// A completion in the natural-functions embedded-call format.
pub fn embedded_call(name: &str, arguments: &str) -> String {
    format!(r#"<functioncall> {{"name": "{name}", "arguments": '{arguments}'}} <|endoftext|>"#)
}

/// Collects formatted log lines emitted while its guard is alive.
///
/// The guard is thread-local, so use it from a current-thread runtime
/// (the `#[tokio::test]` default).
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || sink.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Number of lines containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.contents().lines().filter(|l| l.contains(needle)).count()
    }
}

impl Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
