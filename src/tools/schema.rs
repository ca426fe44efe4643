//! Declarative argument schemas for tools.
//!
//! A [`ToolSchema`] is the single source of truth for a tool's parameters:
//! the descriptor sent to the model and the coercion applied to the model's
//! arguments are both derived from it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use strum::{Display, EnumString};

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ParameterKind {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

/// One named, typed parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub name: String,
    pub kind: ParameterKind,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: String,
}

/// Ordered set of parameters accepted by a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    params: Vec<ParameterSpec>,
}

impl ToolSchema {
    /// A schema with no parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { params: Vec::new() }
    }

    pub fn params(&self) -> &[ParameterSpec] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Names of the required parameters, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }

    /// Render as a JSON Schema object.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                let mut prop = json!({
                    "type": p.kind.to_string(),
                    "description": p.description,
                });
                if let Some(ref default) = p.default {
                    prop["default"] = default.clone();
                }
                (p.name.clone(), prop)
            })
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required(),
        })
    }
}

/// Builder for [`ToolSchema`].
pub struct SchemaBuilder {
    params: Vec<ParameterSpec>,
}

impl SchemaBuilder {
    fn param(
        mut self,
        kind: ParameterKind,
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.params.retain(|p| p.name != name);
        self.params.push(ParameterSpec {
            name,
            kind,
            required,
            default: None,
            description: description.into(),
        });
        self
    }

    /// Add a string parameter.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(ParameterKind::String, name, description, required)
    }

    /// Add an integer parameter.
    pub fn integer(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(ParameterKind::Integer, name, description, required)
    }

    /// Add a number parameter.
    pub fn number(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(ParameterKind::Number, name, description, required)
    }

    /// Add a boolean parameter.
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        self.param(ParameterKind::Boolean, name, description, required)
    }

    /// Give the most recently added parameter a default value.
    ///
    /// A defaulted parameter is never required.
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        if let Some(last) = self.params.last_mut() {
            last.default = Some(value.into());
            last.required = false;
        }
        self
    }

    pub fn build(self) -> ToolSchema {
        ToolSchema {
            params: self.params,
        }
    }
}
