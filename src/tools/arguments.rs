//! Typed access to tool call arguments.

use serde_json::{Map, Value};

use crate::error::NatfnError;

/// Coerced arguments handed to a tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments {
    values: Map<String, Value>,
}

impl ToolArguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str, NatfnError> {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| NatfnError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(|v| v.as_str())
    }

    /// Get an integer argument.
    pub fn get_i64(&self, key: &str) -> Result<i64, NatfnError> {
        self.values
            .get(key)
            .and_then(|v| v.as_i64())
            .ok_or_else(|| NatfnError::InvalidArgument(format!("Missing integer argument: {key}")))
    }

    /// Get a float argument.
    pub fn get_f64(&self, key: &str) -> Result<f64, NatfnError> {
        self.values
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| NatfnError::InvalidArgument(format!("Missing float argument: {key}")))
    }

    /// Get a boolean argument.
    pub fn get_bool(&self, key: &str) -> Result<bool, NatfnError> {
        self.values
            .get(key)
            .and_then(|v| v.as_bool())
            .ok_or_else(|| NatfnError::InvalidArgument(format!("Missing boolean argument: {key}")))
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T, NatfnError> {
        serde_json::from_value(Value::Object(self.values.clone())).map_err(|e| {
            NatfnError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}
