//! Model-facing function descriptors.

use serde::{Deserialize, Serialize};

use super::tool::Tool;

/// Read-only projection of a [`Tool`] in the shape function-calling APIs expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl FunctionDescriptor {
    pub fn from_tool(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            parameters: tool.schema().to_json_schema(),
        }
    }
}

/// Serialize descriptors as JSON indented by four spaces.
pub fn descriptors_to_json(descriptors: &[FunctionDescriptor]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    descriptors.serialize(&mut serializer)?;
    // serde_json only writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
