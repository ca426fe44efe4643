//! Embedded function calls in free text.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::{CallEncoding, CallExtractor, ParsedCall};
use crate::error::Result;
use crate::provider::ProviderResponse;

// The payload is single-quoted JSON; only that fragment is trusted, the
// surrounding text need not be valid JSON.
static FUNCTION_CALL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""name":\s*"([^"]+)",\s*"arguments":\s*'(.*?)'"#)
        .expect("function call regex must compile")
});

/// Find the first embedded function call in `text`.
///
/// Returns `None` when no fragment matches or when its payload is not a
/// JSON object. Never panics on model output.
pub fn parse_function_call(text: &str) -> Option<ParsedCall> {
    let captures = FUNCTION_CALL_RE.captures(text)?;
    let name = captures.get(1)?.as_str();
    let payload = captures.get(2)?.as_str();

    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Object(arguments)) => Some(ParsedCall::new(name, arguments)),
        _ => None,
    }
}

/// Extracts at most one call from the completion text.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTextExtractor;

impl CallExtractor for EmbeddedTextExtractor {
    fn encoding(&self) -> CallEncoding {
        CallEncoding::EmbeddedText
    }

    fn extract(&self, response: &ProviderResponse) -> Result<Vec<ParsedCall>> {
        Ok(parse_function_call(&response.text).into_iter().collect())
    }
}
