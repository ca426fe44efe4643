//! Prompt framing for text-encoded function calling.

use crate::error::Result;
use crate::tools::descriptor::{descriptors_to_json, FunctionDescriptor};

const FUNCTIONS_PREAMBLE: &str = "You are a helpful assistant with access to these functions -";

/// System prompt that lists `descriptors` as indented JSON.
pub fn function_system_prompt(descriptors: &[FunctionDescriptor]) -> Result<String> {
    Ok(format!(
        "{FUNCTIONS_PREAMBLE}\n{}",
        descriptors_to_json(descriptors)?
    ))
}
