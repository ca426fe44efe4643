//! Model definitions and capabilities.

pub mod capabilities;
pub mod ollama;

pub use capabilities::ModelCapabilities;
pub use ollama::OllamaModel;
