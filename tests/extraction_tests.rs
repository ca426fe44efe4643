//! Tests for call extraction from model responses.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use natfn::error::NatfnError;
use natfn::extract::*;
use natfn::models::OllamaModel;
use natfn::provider::ProviderResponse;
use natfn::types::ToolCallRequest;

fn native_response(calls: &[(&str, &str, Value)]) -> ProviderResponse {
    ProviderResponse {
        tool_calls: calls
            .iter()
            .map(|(id, name, arguments)| ToolCallRequest {
                id: id.to_string(),
                name: name.to_string(),
                arguments: arguments.clone(),
            })
            .collect(),
        ..Default::default()
    }
}

#[test]
fn natural_functions_completion_is_decoded() {
    let text = r#"<functioncall> {"name": "get_catcode", "arguments": '{"status_code": 102}'} <|endoftext|>"#;

    let call = parse_function_call(text).unwrap();

    assert_eq!(call.name, "get_catcode");
    assert_eq!(Value::Object(call.arguments), json!({ "status_code": 102 }));
}

#[test]
fn misses_yield_none() {
    for text in [
        "",
        "The sum is 0.",
        r#"{"name": "add", "arguments": {"a": 1}}"#,
        r#""name": "add", "arguments": '{"a": 1'"#,
        r#""name": "add", "arguments": '"just a string"'"#,
    ] {
        assert_eq!(parse_function_call(text), None, "input: {text}");
    }
}

#[test]
fn text_extractor_returns_at_most_one_call() {
    let response = ProviderResponse::text(
        r#""name": "add", "arguments": '{"a": 1, "b": 2}' and "name": "add_item", "arguments": '{}'"#,
    );

    let calls = EmbeddedTextExtractor.extract(&response).unwrap();

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "add");
}

#[test]
fn text_extractor_ignores_structured_calls() {
    let response = native_response(&[("call_1", "add", json!({ "a": 1 }))]);

    assert!(EmbeddedTextExtractor.extract(&response).unwrap().is_empty());
}

#[test]
fn native_extractor_keeps_order_and_ids() {
    let response = native_response(&[
        ("call_a", "add", json!({ "a": 1, "b": 2 })),
        ("call_b", "add_item", json!("{\"item_name\": \"apple\"}")),
    ]);

    let calls = NativeToolCallExtractor.extract(&response).unwrap();

    let summary: Vec<(Option<&str>, &str)> = calls
        .iter()
        .map(|c| (c.id.as_deref(), c.name.as_str()))
        .collect();
    assert_eq!(summary, [(Some("call_a"), "add"), (Some("call_b"), "add_item")]);
    assert_eq!(calls[1].arguments["item_name"], "apple");
}

#[test]
fn native_extractor_rejects_non_object_arguments() {
    let response = native_response(&[("call_1", "add", json!([1, 2]))]);

    let err = NativeToolCallExtractor.extract(&response).unwrap_err();

    assert!(matches!(err, NatfnError::ArgumentValidation { ref tool_name, .. } if tool_name == "add"));
}

#[test]
fn native_extractor_with_no_calls_is_empty() {
    let calls = NativeToolCallExtractor
        .extract(&ProviderResponse::text("just talking"))
        .unwrap();

    assert!(calls.is_empty());
}

#[test]
fn encoding_follows_model_capabilities() {
    assert_eq!(
        CallEncoding::for_capabilities(&OllamaModel::NaturalFunctions.capabilities()),
        CallEncoding::EmbeddedText
    );
    assert_eq!(
        CallEncoding::for_capabilities(&OllamaModel::Llama31.capabilities()),
        CallEncoding::Native
    );
    assert_eq!(
        CallEncoding::Native.extractor().encoding(),
        CallEncoding::Native
    );
}

#[test]
fn encoding_round_trips_through_strings() {
    assert_eq!(CallEncoding::EmbeddedText.to_string(), "embedded_text");
    assert_eq!("native".parse::<CallEncoding>().unwrap(), CallEncoding::Native);
}
