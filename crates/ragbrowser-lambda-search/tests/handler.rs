use std::sync::Arc;

use lambda_runtime::{Context, LambdaEvent};
use serde_json::{json, Value};

use ragbrowser_lambda_search::{handler, Response};
use ragbrowser_lambda_shared::test_utils::{result_with_markdown, sample_event, FakeBackend};
use ragbrowser_lambda_shared::{init_runtime, LambdaRuntime};

fn init_fake_runtime() {
    let _ = init_runtime(|| {
        let backend = FakeBackend::returning(vec![
            result_with_markdown("# AI agents in healthcare"),
            result_with_markdown("Second page"),
        ]);
        Ok(LambdaRuntime::new(Arc::new(backend)))
    });
}

async fn invoke(payload: Value) -> Response {
    init_fake_runtime();
    let event = LambdaEvent::new(payload, Context::default());
    handler(event).await.expect("handler never fails")
}

#[tokio::test]
async fn answers_search_with_success_envelope() {
    let payload = json!({
        "apiPath": "/search",
        "httpMethod": "GET",
        "parameters": [
            {"name": "query", "type": "string", "value": "AI agents in healthcare"},
            {"name": "maxResults", "type": "integer", "value": 2}
        ],
        "agent": "healthcare-agent",
        "actionGroup": "action-call-rag-web-browser",
        "sessionId": "031263542130667",
        "messageVersion": "1.0"
    });

    let response = invoke(payload).await;
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["response"]["httpStatusCode"], 200);
    assert_eq!(
        value["response"]["responseBody"]["application/json"]["body"],
        "# AI agents in healthcare...\nSecond page..."
    );
    assert_eq!(value["messageVersion"], "1.0");
}

#[tokio::test]
async fn rejects_post_with_bad_request() {
    let event = sample_event("POST", &[("query", "x")]);
    let response = invoke(serde_json::to_value(event).unwrap()).await;

    match response {
        Response::Error(err) => {
            assert_eq!(err.status_code, 400);
            assert_eq!(err.message().as_deref(), Some("HTTP method POST not supported"));
        }
        Response::Success(success) => panic!("unexpected success: {success:?}"),
    }
}

#[tokio::test]
async fn malformed_event_is_internal_error() {
    let response = invoke(json!({"httpMethod": "GET", "parameters": "not-a-list"})).await;

    match response {
        Response::Error(err) => {
            assert_eq!(err.status_code, 500);
            assert_eq!(err.message().as_deref(), Some("Internal server error"));
            assert!(err.error().unwrap().starts_with("malformed action-group event"));
        }
        Response::Success(success) => panic!("unexpected success: {success:?}"),
    }
}

#[tokio::test]
async fn blank_query_is_internal_error() {
    let event = sample_event("GET", &[("query", "   ")]);
    let response = invoke(serde_json::to_value(event).unwrap()).await;

    match response {
        Response::Error(err) => {
            assert_eq!(err.status_code, 500);
            assert_eq!(err.message().as_deref(), Some("Internal server error"));
            assert!(err.error().unwrap().contains("query"));
        }
        Response::Success(success) => panic!("unexpected success: {success:?}"),
    }
}
