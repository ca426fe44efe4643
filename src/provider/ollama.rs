//! Ollama chat provider (`POST /api/chat`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::NatfnError;
use crate::models::{ModelCapabilities, OllamaModel};
use crate::types::*;

use super::http::{build_client, shared_client, status_to_error};
use super::{ModelProvider, ProviderRequest, ProviderResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

pub struct OllamaProvider {
    model: OllamaModel,
    base_url: String,
    client: reqwest::Client,
    timeout_ms: Option<u64>,
    capabilities: ModelCapabilities,
}

impl OllamaProvider {
    pub fn new(model: OllamaModel, base_url: impl Into<String>) -> Self {
        let capabilities = model.capabilities();
        Self {
            model,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: shared_client().clone(),
            timeout_ms: None,
            capabilities,
        }
    }

    /// Use a specific HTTP client (e.g. one with a request timeout).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Bound every request by `timeout`; expiry surfaces as [`NatfnError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, NatfnError> {
        self.client = build_client(Some(timeout))?;
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        Ok(self)
    }

    /// Override the capabilities derived from the model name.
    pub fn with_capabilities(mut self, capabilities: ModelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    fn build_request_body(&self, request: &ProviderRequest) -> Value {
        let messages = request
            .messages
            .iter()
            .map(message_to_ollama)
            .collect::<Vec<_>>();

        let mut body = json!({
            "model": self.model.as_str(),
            "messages": messages,
            "stream": false,
        });

        if let Some(ref tools) = request.tools {
            if !tools.is_empty() {
                let tool_defs: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "type": "function",
                            "function": {
                                "name": t.name,
                                "description": t.description,
                                "parameters": t.parameters,
                            }
                        })
                    })
                    .collect();
                body["tools"] = tool_defs.into();
            }
        }

        let options = settings_to_options(&request.settings);
        if !options.is_empty() {
            body["options"] = Value::Object(options);
        }

        body
    }

    fn send_error(&self, err: reqwest::Error) -> NatfnError {
        match self.timeout_ms {
            Some(ms) if err.is_timeout() => NatfnError::Timeout(ms),
            _ => NatfnError::Network(err),
        }
    }
}

#[async_trait]
impl ModelProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    async fn generate_text(&self, request: &ProviderRequest) -> Result<ProviderResponse, NatfnError> {
        let body = self.build_request_body(request);
        let url = format!("{}/api/chat", self.base_url);

        debug!(
            model = self.model.as_str(),
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "Ollama generate_text"
        );

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = resp.status();
        if !status.is_success() {
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text));
        }

        let data: OllamaChatResponse = resp.json().await.map_err(|e| self.send_error(e))?;

        let tool_calls: Vec<ToolCallRequest> = data
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCallRequest {
                id: tc.id.unwrap_or_else(ToolCallRequest::new_id),
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        let finish_reason = if tool_calls.is_empty() {
            data.done_reason.as_deref().and_then(parse_finish_reason)
        } else {
            Some(FinishReason::ToolCalls)
        };

        Ok(ProviderResponse {
            text: data.message.content,
            usage: Usage::new(
                data.prompt_eval_count.unwrap_or(0),
                data.eval_count.unwrap_or(0),
            ),
            tool_calls,
            finish_reason,
        })
    }
}

fn parse_finish_reason(s: &str) -> Option<FinishReason> {
    match s {
        "stop" => Some(FinishReason::Stop),
        "length" => Some(FinishReason::Length),
        _ => None,
    }
}

fn settings_to_options(settings: &GenerationSettings) -> Map<String, Value> {
    let mut options = Map::new();
    if let Some(max) = settings.max_tokens {
        options.insert("num_predict".into(), max.into());
    }
    if let Some(temp) = settings.temperature {
        options.insert("temperature".into(), temp.into());
    }
    if let Some(top_p) = settings.top_p {
        options.insert("top_p".into(), top_p.into());
    }
    if let Some(top_k) = settings.top_k {
        options.insert("top_k".into(), top_k.into());
    }
    if let Some(seed) = settings.seed {
        options.insert("seed".into(), seed.into());
    }
    if let Some(ref stops) = settings.stop_sequences {
        options.insert("stop".into(), json!(stops));
    }
    options
}

fn message_to_ollama(msg: &ModelMessage) -> Value {
    let mut out = json!({
        "role": msg.role.as_str(),
        "content": msg.text(),
    });

    let tool_calls = msg.tool_calls();
    if !tool_calls.is_empty() {
        out["tool_calls"] = tool_calls
            .iter()
            .map(|tc| {
                json!({
                    "id": tc.id,
                    "function": {
                        "name": tc.name,
                        "arguments": arguments_as_object(&tc.arguments),
                    }
                })
            })
            .collect::<Vec<_>>()
            .into();
    }

    if let Some(id) = msg.tool_call_id() {
        out["tool_call_id"] = id.into();
        if let Some(ref name) = msg.name {
            out["tool_name"] = name.clone().into();
        }
    }

    out
}

// Ollama wants arguments as an object even when they arrived as JSON text.
fn arguments_as_object(arguments: &Value) -> Value {
    match arguments {
        Value::String(raw) => serde_json::from_str::<Value>(raw)
            .ok()
            .filter(Value::is_object)
            .unwrap_or_else(|| json!({})),
        Value::Null => json!({}),
        other => other.clone(),
    }
}

// Ollama API response types (internal)

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
    done_reason: Option<String>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
    tool_calls: Option<Vec<OllamaToolCall>>,
}

#[derive(Deserialize)]
struct OllamaToolCall {
    id: Option<String>,
    function: OllamaFunction,
}

#[derive(Deserialize)]
struct OllamaFunction {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::FunctionDescriptor;

    fn provider() -> OllamaProvider {
        OllamaProvider::new(OllamaModel::Llama31, "http://localhost:11434/")
    }

    #[test]
    fn body_carries_model_messages_and_options() {
        let settings = GenerationSettings::builder().temperature(0.0).max_tokens(64).build();
        let request = ProviderRequest::new(vec![ModelMessage::user("hi")], settings);

        let body = provider().build_request_body(&request);

        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0], json!({ "role": "user", "content": "hi" }));
        assert_eq!(body["options"]["temperature"], 0.0);
        assert_eq!(body["options"]["num_predict"], 64);
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn body_wraps_descriptors_as_functions() {
        let request = ProviderRequest::new(vec![ModelMessage::user("hi")], GenerationSettings::default())
            .with_tools(vec![FunctionDescriptor {
                name: "add".into(),
                description: "adds".into(),
                parameters: json!({ "type": "object" }),
            }]);

        let body = provider().build_request_body(&request);

        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "add");
        assert!(body.get("options").is_none());
    }

    #[test]
    fn tool_messages_keep_correlation_id() {
        let call = ToolCallRequest {
            id: "call_1".into(),
            name: "add".into(),
            arguments: json!("{\"a\": 1}"),
        };
        let assistant = message_to_ollama(&ModelMessage::assistant_with_tool_calls("", &[call]));
        let tool = message_to_ollama(&ModelMessage::tool_result("call_1", "add", "1"));

        assert_eq!(assistant["tool_calls"][0]["function"]["arguments"], json!({ "a": 1 }));
        assert_eq!(tool["role"], "tool");
        assert_eq!(tool["tool_call_id"], "call_1");
        assert_eq!(tool["tool_name"], "add");
        assert_eq!(tool["content"], "1");
    }

    #[test]
    fn trims_trailing_slash_from_base_url() {
        assert_eq!(provider().base_url, "http://localhost:11434");
    }
}
