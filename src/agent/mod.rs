//! Conversational agent: a persistent transcript with tool execution.

pub mod agent;
pub mod transcript;

pub use agent::Agent;
pub use transcript::Transcript;
