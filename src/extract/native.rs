//! Calls delivered through the runtime's structured tool-call fields.

use serde_json::Value;

use super::{CallEncoding, CallExtractor, ParsedCall};
use crate::error::{NatfnError, Result};
use crate::provider::ProviderResponse;
use crate::tools::validation::json_type_name;

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeToolCallExtractor;

impl CallExtractor for NativeToolCallExtractor {
    fn encoding(&self) -> CallEncoding {
        CallEncoding::Native
    }

    fn extract(&self, response: &ProviderResponse) -> Result<Vec<ParsedCall>> {
        response
            .tool_calls
            .iter()
            .map(|tc| -> Result<ParsedCall> {
                let arguments = decode_arguments(&tc.arguments)
                    .map_err(|message| NatfnError::arguments(&tc.name, message))?;
                Ok(ParsedCall::new(&tc.name, arguments).with_id(&tc.id))
            })
            .collect()
    }
}

fn decode_arguments(raw: &Value) -> std::result::Result<serde_json::Map<String, Value>, String> {
    match raw {
        Value::Object(map) => Ok(map.clone()),
        Value::Null => Ok(serde_json::Map::new()),
        Value::String(text) if text.trim().is_empty() => Ok(serde_json::Map::new()),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(format!("expected object arguments, got {}", json_type_name(&other))),
            Err(e) => Err(format!("arguments are not valid JSON: {e}")),
        },
        other => Err(format!("expected object arguments, got {}", json_type_name(other))),
    }
}
