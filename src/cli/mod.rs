//! Command-line interface for natfn.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ExtractionMode, NatfnConfig};
use crate::error::{ErrorCategory, NatfnError, Result};

/// Function calling against a local Ollama model
#[derive(Parser, Debug)]
#[command(name = "natfn", version, about = "Natural-language function calling for local models")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Model name (e.g. calebfahlgren/natural-functions, llama3.1)
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Ollama server URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Attempts before giving up on extracting a call
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Call extraction strategy (auto, text, native)
    #[arg(long, global = true)]
    pub extraction: Option<ExtractionMode>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract and run one function call per input text
    Call {
        /// Requests, each handled independently
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Chat with the agent, reading lines from stdin
    Chat,
}

impl Cli {
    /// Resolve configuration: file and environment, then flags.
    pub fn load_config(&self) -> Result<NatfnConfig> {
        let mut config = NatfnConfig::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut NatfnConfig) {
        if let Some(ref model) = self.model {
            config.model = model.clone();
        }
        if let Some(ref url) = self.base_url {
            config.base_url = url.clone();
        }
        if let Some(n) = self.max_attempts {
            config.retry.max_attempts = n;
        }
        if let Some(mode) = self.extraction {
            config.extraction = mode;
        }
    }
}

/// A line typed into `natfn chat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Message(String),
    Reset,
    Items,
    Quit,
    Empty,
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "/reset" => Self::Reset,
            "/items" => Self::Items,
            "/quit" | "/exit" => Self::Quit,
            text => Self::Message(text.to_string()),
        }
    }
}

/// What `natfn chat` does after a turn fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnFailure {
    /// Transient; the same message may succeed if sent again.
    Retry,
    /// The turn is lost but the session is usable.
    Continue,
    /// No later turn can succeed.
    Abort,
}

impl TurnFailure {
    pub fn classify(err: &NatfnError) -> Self {
        if err.is_retryable() {
            return Self::Retry;
        }
        match err.category() {
            ErrorCategory::Authentication | ErrorCategory::Configuration => Self::Abort,
            _ => Self::Continue,
        }
    }
}
