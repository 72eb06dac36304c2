//! End-to-end handler tests against an in-process stub of the upstream API.

use std::time::Duration;

use serde_json::json;

use ragbrowser_lambda_search::{handle_action, Response};
use ragbrowser_lambda_shared::test_utils::{mock_request_id, sample_event};
use ragbrowser_lib::test_utils::{StubReply, StubServer};
use ragbrowser_lib::{ClientConfig, RagWebBrowserClient};

fn client_for(server: &StubServer) -> RagWebBrowserClient {
    let config = ClientConfig::new("test-token")
        .with_base_url(server.base_url())
        .expect("stub URL is valid");
    RagWebBrowserClient::new(config).expect("client builds")
}

#[test]
fn truncates_and_joins_upstream_markdown() {
    let body = json!([
        {"metadata": {"title": "Long", "url": "https://a.example"}, "markdown": "A".repeat(6000)},
        {"metadata": {"title": "Short", "url": "https://b.example"}, "markdown": "B"}
    ]);
    let server = StubServer::json(200, body.to_string());
    let client = client_for(&server);

    let event = sample_event("GET", &[("query", "AI agents in healthcare")]);
    let response = handle_action(&event, &client, &mock_request_id("shape"));

    match response {
        Response::Success(success) => {
            let expected = format!("{}...\nB...", "A".repeat(5000));
            assert_eq!(success.body(), Some(expected.as_str()));
        }
        Response::Error(err) => panic!("unexpected error: {err:?}"),
    }

    let request = server.next_request().expect("request captured");
    let query = request.query_pairs();
    assert_eq!(query.get("maxResults").map(String::as_str), Some("3"));
    assert_eq!(query.get("outputFormats").map(String::as_str), Some("markdown"));
    assert_eq!(request.header("authorization"), Some("Bearer test-token"));
}

#[test]
fn post_never_reaches_upstream() {
    let server = StubServer::json(200, "[]");
    let client = client_for(&server);

    let event = sample_event("POST", &[("query", "x")]);
    let response = handle_action(&event, &client, &mock_request_id("post"));

    assert_eq!(response.status_code(), 400);
    assert!(server.next_request().is_none());
}

#[test]
fn upstream_timeout_is_internal_error() {
    let server = StubServer::start(vec![StubReply::Stall(Duration::from_secs(3))]);
    let client = client_for(&server);

    let event = sample_event("GET", &[("query", "slow"), ("requestTimeoutSecs", "1")]);
    let response = handle_action(&event, &client, &mock_request_id("timeout"));

    match response {
        Response::Error(err) => {
            assert_eq!(err.status_code, 500);
            assert_eq!(err.message().as_deref(), Some("Internal server error"));
            assert!(err.error().is_some_and(|e| !e.is_empty()));
        }
        Response::Success(success) => panic!("unexpected success: {success:?}"),
    }
}

#[test]
fn upstream_auth_failure_is_internal_error() {
    let server = StubServer::json(
        401,
        r#"{"error":{"type":"token-not-valid","message":"User was not found or authentication token is not valid"}}"#,
    );
    let client = client_for(&server);

    let event = sample_event("GET", &[("query", "x")]);
    let response = handle_action(&event, &client, &mock_request_id("401"));

    match response {
        Response::Error(err) => {
            assert_eq!(err.status_code, 500);
            let detail = err.error().unwrap();
            assert!(detail.contains("401"));
            assert!(detail.contains("authentication token is not valid"));
        }
        Response::Success(success) => panic!("unexpected success: {success:?}"),
    }
}

#[test]
fn huge_request_timeout_does_not_abort_the_call() {
    let server = StubServer::json(200, "[]");
    let client = client_for(&server);

    let event = sample_event(
        "GET",
        &[("query", "x"), ("requestTimeoutSecs", "18446744073709551615")],
    );
    let response = handle_action(&event, &client, &mock_request_id("hugetimeout"));

    assert_eq!(response.status_code(), 200);
    let request = server.next_request().expect("request captured");
    assert_eq!(
        request.query_pairs().get("requestTimeoutSecs").map(String::as_str),
        Some("18446744073709551615")
    );
}

#[test]
fn oversized_max_results_is_forwarded_as_cap() {
    let server = StubServer::json(200, "[]");
    let client = client_for(&server);

    let event = sample_event("GET", &[("query", "x"), ("maxResults", "99999999999999999999")]);
    let response = handle_action(&event, &client, &mock_request_id("bigmax"));

    assert_eq!(response.status_code(), 200);
    let request = server.next_request().expect("request captured");
    assert_eq!(request.query_pairs().get("maxResults").map(String::as_str), Some("3"));
}
