//! Tests for the single-shot function-call loop.

mod common;

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

use common::{embedded_call, LogCapture, MockProvider};
use natfn::caller::FunctionCaller;
use natfn::error::NatfnError;
use natfn::extract::{CallEncoding, ParsedCall};
use natfn::tools::builtin::default_registry;
use natfn::tools::{coerce_arguments, FunctionDescriptor, ItemStore, ToolRegistry};
use natfn::types::Role;
use natfn::util::retry::RetryPolicy;

fn registry(items: &ItemStore) -> ToolRegistry {
    default_registry(items.clone(), reqwest::Client::new()).unwrap()
}

#[tokio::test]
async fn adds_two_numbers_from_embedded_call() {
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response(&embedded_call("add", r#"{"a": 999, "b": -999}"#));
    let caller = FunctionCaller::new(provider.clone());

    let result = caller
        .call("add 999 and -999", &registry(&ItemStore::new()))
        .await
        .unwrap();

    assert_eq!(result, json!(0));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn adds_item_to_injected_store() {
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response(&embedded_call("add_item", r#"{"item_name": "apple"}"#));
    let items = ItemStore::new();
    let caller = FunctionCaller::new(provider);

    let result = caller
        .call("add an apple to my list", &registry(&items))
        .await
        .unwrap();

    assert_eq!(result["item_name"], "apple");
    assert_eq!(items.len(), 1);
    assert_eq!(items.items()[0].item_name, "apple");
}

#[tokio::test]
async fn retries_after_malformed_output() {
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response("I think you want to add something.");
    provider.queue_response(&embedded_call("add", r#"{"a": 1, "b": 2}"#));
    let caller = FunctionCaller::new(provider.clone());

    let result = caller
        .call("add 1 and 2", &registry(&ItemStore::new()))
        .await
        .unwrap();

    assert_eq!(result, json!(3));
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn malformed_output_is_logged_once() {
    let logs = LogCapture::default();
    let _guard = logs.install();
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response("I think you want to add something.");
    provider.queue_response(&embedded_call("add", r#"{"a": 1, "b": 2}"#));
    let caller = FunctionCaller::new(provider);

    caller.get_function_call("add 1 and 2", &[]).await.unwrap();

    assert_eq!(logs.count("failed to parse function call"), 1);
    assert_eq!(logs.count("retrying"), 1);
    assert_eq!(logs.count("requesting function call"), 2);
}

#[tokio::test]
async fn n_failures_then_success_makes_n_plus_one_calls() {
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response("no call here");
    provider.queue_response(r#""name": "add", "arguments": 'not json'"#);
    provider.queue_response(r#""name": "add", "arguments": '[1, 2]'"#);
    provider.queue_response(&embedded_call("add", r#"{"a": 5, "b": 5}"#));
    let caller = FunctionCaller::new(provider.clone());

    let call = caller.get_function_call("add 5 and 5", &[]).await.unwrap();

    assert_eq!(call.name, "add");
    assert_eq!(provider.call_count(), 4);
}

#[tokio::test]
async fn gives_up_after_max_attempts() {
    let provider = Arc::new(MockProvider::text_model());
    for _ in 0..3 {
        provider.queue_response("still thinking");
    }
    let caller = FunctionCaller::new(provider.clone()).with_retry(RetryPolicy::attempts(3));

    let err = caller.get_function_call("add", &[]).await.unwrap_err();

    assert!(matches!(err, NatfnError::RetryExhausted { attempts: 3 }));
    assert_eq!(provider.call_count(), 3);
}

#[tokio::test]
async fn default_policy_allows_five_attempts() {
    let provider = Arc::new(MockProvider::text_model());
    for _ in 0..6 {
        provider.queue_response("nothing");
    }
    let caller = FunctionCaller::new(provider.clone());

    let err = caller.get_function_call("add", &[]).await.unwrap_err();

    assert!(matches!(err, NatfnError::RetryExhausted { attempts: 5 }));
    assert_eq!(provider.call_count(), 5);
}

#[tokio::test]
async fn provider_errors_are_not_retried() {
    // Nothing queued: the mock answers with an API error.
    let provider = Arc::new(MockProvider::text_model());
    let caller = FunctionCaller::new(provider.clone());

    let err = caller.get_function_call("add", &[]).await.unwrap_err();

    assert!(matches!(err, NatfnError::Api { status: 500, .. }));
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn every_attempt_sends_a_fresh_prompt() {
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response("nope");
    provider.queue_response("nope again");
    provider.queue_response(&embedded_call("add", r#"{"a": 1, "b": 1}"#));
    let registry = registry(&ItemStore::new());
    let caller = FunctionCaller::new(provider.clone());

    caller
        .get_function_call("add 1 and 1", &registry.describe_all())
        .await
        .unwrap();

    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        let roles: Vec<Role> = request.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, [Role::System, Role::User]);
        assert_eq!(request.messages[1].text(), "add 1 and 1");
        assert!(request.tools.is_none());
    }
    assert_eq!(requests[0].messages[0].text(), requests[2].messages[0].text());
}

#[tokio::test]
async fn system_prompt_round_trips_descriptors() {
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response(&embedded_call("add", r#"{"a": 1, "b": 1}"#));
    let registry = registry(&ItemStore::new());
    let caller = FunctionCaller::new(provider.clone());

    caller
        .get_function_call("add", &registry.describe_all())
        .await
        .unwrap();

    let system = provider.requests()[0].messages[0].text();
    let (preamble, body) = system.split_once('\n').unwrap();
    assert_eq!(
        preamble,
        "You are a helpful assistant with access to these functions -"
    );
    assert!(body.contains("\n    {"), "descriptors are indented by four spaces");
    let parsed: Vec<FunctionDescriptor> = serde_json::from_str(body).unwrap();
    assert_eq!(parsed, registry.describe_all());
}

#[tokio::test]
async fn native_models_receive_tool_descriptors() {
    let provider = Arc::new(MockProvider::native_model());
    provider.queue_tool_calls(&[("call_1", "add", json!({ "a": "7", "b": 3 }))]);
    let registry = registry(&ItemStore::new());
    let caller = FunctionCaller::new(provider.clone());

    assert_eq!(caller.encoding(), CallEncoding::Native);
    let result = caller.call("add 7 and 3", &registry).await.unwrap();

    assert_eq!(result, json!(10));
    let request = &provider.requests()[0];
    let offered: Vec<&str> = request
        .tools
        .as_ref()
        .unwrap()
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(offered, ["add_item", "get_catcode", "add"]);
}

#[tokio::test]
async fn native_call_with_undecodable_arguments_is_retried() {
    let provider = Arc::new(MockProvider::native_model());
    provider.queue_tool_calls(&[("call_1", "add", json!("{a: 1"))]);
    provider.queue_tool_calls(&[("call_2", "add", json!("{\"a\": 1, \"b\": 1}"))]);
    let caller = FunctionCaller::new(provider.clone());

    let call = caller.get_function_call("add", &[]).await.unwrap();

    assert_eq!(call.id.as_deref(), Some("call_2"));
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn unknown_tool_from_model_is_reported() {
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response(&embedded_call("subtract", r#"{"a": 1, "b": 1}"#));
    let caller = FunctionCaller::new(provider);

    let err = caller
        .call("subtract", &registry(&ItemStore::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, NatfnError::UnknownTool(ref name) if name == "subtract"));
}

#[tokio::test]
async fn extracted_call_keeps_model_arguments() {
    let provider = Arc::new(MockProvider::text_model());
    provider.queue_response(&embedded_call("get_catcode", r#"{"status_code": 102}"#));
    let caller = FunctionCaller::new(provider);

    let call = caller.get_function_call("cat for 102", &[]).await.unwrap();

    let expected = ParsedCall::new(
        "get_catcode",
        json!({ "status_code": 102 }).as_object().cloned().unwrap(),
    );
    assert_eq!(call, expected);
}

fn sample_value(kind: &str) -> Value {
    match kind {
        "integer" => json!(7),
        "number" => json!(1.5),
        "boolean" => json!(true),
        _ => json!("apple"),
    }
}

#[tokio::test]
async fn every_builtin_descriptor_round_trips_through_extraction() {
    let registry = registry(&ItemStore::new());
    let descriptors = registry.describe_all();

    for descriptor in &descriptors {
        let arguments: Map<String, Value> = descriptor.parameters["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|name| {
                let name = name.as_str().unwrap();
                let kind = descriptor.parameters["properties"][name]["type"].as_str().unwrap();
                (name.to_string(), sample_value(kind))
            })
            .collect();
        let provider = Arc::new(MockProvider::text_model());
        provider.queue_response(&embedded_call(
            &descriptor.name,
            &serde_json::to_string(&arguments).unwrap(),
        ));
        let caller = FunctionCaller::new(provider);

        let call = caller
            .get_function_call("do it", &descriptors)
            .await
            .unwrap();

        assert_eq!(call.name, descriptor.name);
        assert_eq!(call.arguments, arguments);
        let tool = registry.resolve(&call.name).unwrap();
        assert!(
            coerce_arguments(tool.schema(), &Value::Object(call.arguments)).is_ok(),
            "{} arguments should validate",
            descriptor.name
        );
    }
}
