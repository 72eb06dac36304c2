//! Test utilities for Lambda handler testing.
//!
//! Provides a scripted [`SearchBackend`] that never touches the network and
//! builders for action-group events.
//!
//! # Usage
//!
//! ```ignore
//! use ragbrowser_lambda_shared::test_utils::{mock_request_id, sample_event, FakeBackend};
//!
//! let backend = FakeBackend::returning(vec![result_with_markdown("# Hello")]);
//! let event = sample_event("GET", &[("query", "AI agents in healthcare")]);
//! // ... pass both to the handler and assert on backend.calls()
//! ```

use std::sync::Mutex;

use http::Method;

use ragbrowser_lib::{
    Error as LibError, QueryParameters, Result as LibResult, ResultMetadata, SearchBackend,
    SearchResult,
};

use crate::{ActionGroupEvent, ActionParameter};

/// Action group name used by [`sample_event`].
pub const SAMPLE_ACTION_GROUP: &str = "action-call-rag-web-browser";

/// One call observed by [`FakeBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub params: QueryParameters,
}

enum Script {
    Results(Vec<SearchResult>),
    Status { status: u16, message: String },
}

/// In-memory backend with a fixed answer.
pub struct FakeBackend {
    script: Script,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeBackend {
    /// Answer every call with `results`.
    pub fn returning(results: Vec<SearchResult>) -> Self {
        Self::scripted(Script::Results(results))
    }

    /// Fail every call as if the upstream answered with `status`.
    pub fn failing(status: u16, message: impl Into<String>) -> Self {
        Self::scripted(Script::Status {
            status,
            message: message.into(),
        })
    }

    fn scripted(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

impl SearchBackend for FakeBackend {
    fn invoke(
        &self,
        method: &Method,
        path: &str,
        params: &QueryParameters,
    ) -> LibResult<Vec<SearchResult>> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push(RecordedCall {
                method: method.clone(),
                path: path.to_string(),
                params: params.clone(),
            });

        match &self.script {
            Script::Results(results) => Ok(results.clone()),
            Script::Status { status, message } => Err(LibError::UpstreamStatus {
                status: *status,
                message: Some(message.clone()),
            }),
        }
    }
}

/// A search result carrying only a title and a markdown body.
pub fn result_with_markdown(markdown: &str) -> SearchResult {
    SearchResult {
        metadata: ResultMetadata {
            title: Some("Sample page".to_string()),
            url: Some("https://www.example.com/".to_string()),
            ..ResultMetadata::default()
        },
        markdown: Some(markdown.to_string()),
        ..SearchResult::default()
    }
}

/// Action-group event for `/search` with string parameters.
pub fn sample_event(method: &str, params: &[(&str, &str)]) -> ActionGroupEvent {
    ActionGroupEvent {
        api_path: "/search".to_string(),
        http_method: method.to_string(),
        parameters: params
            .iter()
            .map(|(name, value)| ActionParameter::new(*name, "string", *value))
            .collect(),
        action_group: SAMPLE_ACTION_GROUP.to_string(),
        message_version: "1.0".to_string(),
        agent: Some(serde_json::Value::String("healthcare-agent".to_string())),
        session_id: Some("031263542130667".to_string()),
        input_text: None,
    }
}

/// Create a mock request ID for testing.
///
/// `lambda_runtime::Context` is non-exhaustive, so tests that call the
/// synchronous handler directly pass a request ID of the form
/// `test-request-{suffix}`.
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{}", suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_backend_records_calls() {
        let backend = FakeBackend::returning(vec![result_with_markdown("# Hi")]);
        let params = QueryParameters::new().with("query", "x");
        let results = backend.search(&params).unwrap();

        assert_eq!(results.len(), 1);
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::GET);
        assert_eq!(calls[0].path, "/search");
        assert_eq!(calls[0].params, params);
    }

    #[test]
    fn failing_backend_reports_status() {
        let backend = FakeBackend::failing(503, "Service Unavailable");
        let err = backend.search(&QueryParameters::new()).unwrap_err();
        assert!(matches!(err, LibError::UpstreamStatus { status: 503, .. }));
    }

    #[test]
    fn sample_event_carries_parameters() {
        let event = sample_event("GET", &[("query", "AI"), ("maxResults", "5")]);
        assert_eq!(event.action_group, SAMPLE_ACTION_GROUP);
        assert_eq!(event.query_parameters().get("maxResults"), Some("5"));
    }

    #[test]
    fn mock_request_id_formats_correctly() {
        assert_eq!(mock_request_id("123"), "test-request-123");
    }
}
