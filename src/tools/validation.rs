//! Validate and coerce tool call arguments against a [`ToolSchema`].

use serde_json::{Map, Number, Value};

use super::schema::{ParameterKind, ToolSchema};

/// Coerce raw arguments into the shape declared by `schema`.
///
/// Accepts an object, or JSON text holding an object. Declared parameters
/// are coerced to their kind, absent ones fall back to their default, and
/// undeclared fields are dropped. Returns `Err(message)` describing the
/// first violation found.
pub fn coerce_arguments(schema: &ToolSchema, raw: &Value) -> Result<Map<String, Value>, String> {
    let decoded;
    let raw = match raw {
        Value::String(text) => {
            let trimmed = text.trim();
            decoded = if trimmed.is_empty() {
                Value::Object(Map::new())
            } else {
                serde_json::from_str::<Value>(trimmed)
                    .map_err(|e| format!("arguments are not valid JSON: {e}"))?
            };
            &decoded
        }
        Value::Null => return coerce_object(schema, &Map::new()),
        other => other,
    };

    match raw {
        Value::Object(obj) => coerce_object(schema, obj),
        other => Err(format!(
            "expected object arguments, got {}",
            json_type_name(other)
        )),
    }
}

fn coerce_object(schema: &ToolSchema, obj: &Map<String, Value>) -> Result<Map<String, Value>, String> {
    let mut out = Map::new();
    for param in schema.params() {
        match obj.get(&param.name) {
            Some(value) => {
                let coerced = coerce_value(value, param.kind).ok_or_else(|| {
                    format!(
                        "field '{}' expected type '{}', got {}",
                        param.name,
                        param.kind,
                        json_type_name(value)
                    )
                })?;
                out.insert(param.name.clone(), coerced);
            }
            None => {
                if let Some(ref default) = param.default {
                    out.insert(param.name.clone(), default.clone());
                } else if param.required {
                    return Err(format!("missing required field '{}'", param.name));
                }
            }
        }
    }
    Ok(out)
}

fn coerce_value(value: &Value, kind: ParameterKind) -> Option<Value> {
    match kind {
        ParameterKind::String => match value {
            Value::String(_) => Some(value.clone()),
            Value::Number(n) => Some(Value::String(n.to_string())),
            Value::Bool(b) => Some(Value::String(b.to_string())),
            _ => None,
        },
        ParameterKind::Integer => match value {
            Value::Number(n) if n.is_i64() => Some(value.clone()),
            // Out of i64 range
            Value::Number(n) if n.is_u64() => None,
            Value::Number(n) => n.as_f64().and_then(integral_float),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .map(Value::from)
                    .or_else(|| s.parse::<f64>().ok().and_then(integral_float))
            }
            _ => None,
        },
        ParameterKind::Number => match value {
            Value::Number(_) => Some(value.clone()),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .map(Value::from)
                    .or_else(|| s.parse::<f64>().ok().and_then(Number::from_f64).map(Value::Number))
            }
            _ => None,
        },
        ParameterKind::Boolean => match value {
            Value::Bool(_) => Some(value.clone()),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        },
        ParameterKind::Object => value.is_object().then(|| value.clone()),
        ParameterKind::Array => value.is_array().then(|| value.clone()),
    }
}

fn integral_float(f: f64) -> Option<Value> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64).then(|| Value::from(f as i64))
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
