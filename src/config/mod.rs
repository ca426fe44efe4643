//! Configuration (layered: defaults < TOML file < environment < code).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::agent::Agent;
use crate::caller::FunctionCaller;
use crate::error::{NatfnError, Result};
use crate::extract::{extractor_for, CallEncoding};
use crate::models::{ModelCapabilities, OllamaModel};
use crate::provider::http::build_client;
use crate::provider::{ollama, ModelProvider, OllamaProvider};
use crate::tools::ToolRegistry;
use crate::types::GenerationSettings;
use crate::util::retry::RetryPolicy;

pub const DEFAULT_MODEL: &str = "calebfahlgren/natural-functions";

/// Which call extraction strategy to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExtractionMode {
    /// Follow the model's capabilities.
    #[default]
    Auto,
    /// Always parse embedded calls from the completion text.
    Text,
    /// Always read the runtime's structured tool calls.
    Native,
}

impl ExtractionMode {
    pub fn resolve(self, capabilities: &ModelCapabilities) -> CallEncoding {
        match self {
            Self::Auto => CallEncoding::for_capabilities(capabilities),
            Self::Text => CallEncoding::EmbeddedText,
            Self::Native => CallEncoding::Native,
        }
    }
}

/// Retry settings for function-call extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub multiplier: f64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_ms: 0,
            max_backoff_ms: 30_000,
            multiplier: 2.0,
        }
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NatfnConfig {
    /// Ollama server, e.g. `http://localhost:11434`.
    pub base_url: String,
    pub model: String,
    pub extraction: ExtractionMode,
    pub retry: RetrySettings,
    /// Per-request HTTP timeout; unset waits indefinitely.
    pub request_timeout_ms: Option<u64>,
    pub settings: GenerationSettings,
}

impl Default for NatfnConfig {
    fn default() -> Self {
        Self {
            base_url: ollama::DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            extraction: ExtractionMode::Auto,
            retry: RetrySettings::default(),
            request_timeout_ms: None,
            settings: GenerationSettings::default(),
        }
    }
}

impl NatfnConfig {
    /// Read a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| NatfnError::Configuration(format!("{}: {e}", path.display())))
    }

    /// Defaults overridden by environment variables (and `.env`, if present).
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Optional file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `OLLAMA_BASE_URL`, `NATFN_*` variables on top of this config.
    pub fn apply_env(&mut self) -> Result<()> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("OLLAMA_BASE_URL") {
            self.base_url = url;
        }
        if let Some(model) = lookup("NATFN_MODEL") {
            self.model = model;
        }
        if let Some(mode) = lookup("NATFN_EXTRACTION") {
            self.extraction = mode.parse().map_err(|_| {
                NatfnError::Configuration(format!(
                    "NATFN_EXTRACTION must be auto, text or native, got '{mode}'"
                ))
            })?;
        }
        if let Some(n) = lookup("NATFN_MAX_ATTEMPTS") {
            self.retry.max_attempts = parse_var("NATFN_MAX_ATTEMPTS", &n)?;
        }
        if let Some(ms) = lookup("NATFN_RETRY_BACKOFF_MS") {
            self.retry.backoff_ms = parse_var("NATFN_RETRY_BACKOFF_MS", &ms)?;
        }
        if let Some(ms) = lookup("NATFN_REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms = Some(parse_var("NATFN_REQUEST_TIMEOUT_MS", &ms)?);
        }
        Ok(())
    }

    pub fn ollama_model(&self) -> OllamaModel {
        self.model
            .parse()
            .unwrap_or_else(|_| OllamaModel::Custom(self.model.clone()))
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::attempts(self.retry.max_attempts).with_backoff(
            Duration::from_millis(self.retry.backoff_ms),
            Duration::from_millis(self.retry.max_backoff_ms),
            self.retry.multiplier,
        )
    }

    /// HTTP client honouring `request_timeout_ms`.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        build_client(self.request_timeout_ms.map(Duration::from_millis))
    }

    pub fn build_provider(&self) -> Result<Arc<dyn ModelProvider>> {
        let provider = OllamaProvider::new(self.ollama_model(), self.base_url.clone());
        let provider = match self.request_timeout_ms {
            Some(ms) => provider.with_timeout(Duration::from_millis(ms))?,
            None => provider,
        };
        Ok(Arc::new(provider))
    }

    pub fn encoding_for(&self, provider: &dyn ModelProvider) -> CallEncoding {
        self.extraction.resolve(provider.capabilities())
    }

    /// Single-shot caller wired from this config.
    pub fn function_caller(&self) -> Result<FunctionCaller> {
        let provider = self.build_provider()?;
        let encoding = self.encoding_for(provider.as_ref());
        Ok(FunctionCaller::new(provider)
            .with_extractor(extractor_for(encoding))
            .with_retry(self.retry_policy())
            .with_settings(self.settings.clone()))
    }

    /// Conversational agent wired from this config.
    pub fn agent(&self, registry: Arc<ToolRegistry>) -> Result<Agent> {
        let provider = self.build_provider()?;
        let encoding = self.encoding_for(provider.as_ref());
        Ok(Agent::new(provider, registry)
            .with_extractor(extractor_for(encoding))
            .with_settings(self.settings.clone()))
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| NatfnError::Configuration(format!("{name} has invalid value '{value}'")))
}
