//! Success and error envelopes returned to the agent platform.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use ragbrowser_lib::Error as LibError;

use crate::ActionGroupEvent;

/// Content type under which the shaped body is returned.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Success envelope for an action-group invocation.
///
/// # Example
///
/// ```
/// use ragbrowser_lambda_shared::{ActionGroupEvent, ActionGroupResponse};
///
/// let event: ActionGroupEvent = serde_json::from_value(serde_json::json!({
///     "apiPath": "/search",
///     "httpMethod": "GET",
///     "actionGroup": "action-call-rag-web-browser",
///     "messageVersion": "1.0"
/// }))
/// .unwrap();
///
/// let response = ActionGroupResponse::success(&event, "# Title...".to_string());
/// assert_eq!(response.response.http_status_code, 200);
/// assert_eq!(response.body(), Some("# Title..."));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupResponse {
    pub response: ActionResponse,
    pub message_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub action_group: String,
    pub api_path: String,
    pub http_method: String,
    pub http_status_code: u16,
    /// Keyed by content type; only [`JSON_CONTENT_TYPE`] is produced.
    pub response_body: BTreeMap<String, ResponseBody>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub body: String,
}

impl ActionGroupResponse {
    /// Wrap `body` in a 200 envelope echoing the event's routing fields.
    pub fn success(event: &ActionGroupEvent, body: String) -> Self {
        let mut response_body = BTreeMap::new();
        response_body.insert(JSON_CONTENT_TYPE.to_string(), ResponseBody { body });

        Self {
            response: ActionResponse {
                action_group: event.action_group.clone(),
                api_path: event.api_path.clone(),
                http_method: event.http_method.clone(),
                http_status_code: 200,
                response_body,
            },
            message_version: event.message_version.clone(),
        }
    }

    /// The shaped body carried under [`JSON_CONTENT_TYPE`].
    pub fn body(&self) -> Option<&str> {
        self.response
            .response_body
            .get(JSON_CONTENT_TYPE)
            .map(|b| b.body.as_str())
    }
}

/// `{statusCode, body}` error envelope. `body` is a JSON-encoded object with
/// a `message` and, except for unsupported methods, an `error` field.
///
/// Status 400 is reserved for unsupported methods; every other failure,
/// including malformed input, is reported as 500.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub body: String,
}

impl ErrorResponse {
    fn new(status_code: u16, body: Value) -> Self {
        Self {
            status_code,
            body: body.to_string(),
        }
    }

    /// 400 for a request method other than GET.
    pub fn unsupported_method(method: impl Display) -> Self {
        Self::new(
            400,
            json!({ "message": format!("HTTP method {method} not supported") }),
        )
    }

    /// 500 for every other failure: malformed event or parameters, upstream
    /// status, timeout, decode.
    pub fn internal_error(error: impl Display) -> Self {
        Self::new(
            500,
            json!({ "message": "Internal server error", "error": error.to_string() }),
        )
    }

    /// 400 for an unsupported method, 500 for anything else.
    pub fn from_error(err: &LibError) -> Self {
        match err {
            LibError::UnsupportedMethod { method } => Self::unsupported_method(method),
            other => Self::internal_error(other),
        }
    }

    /// Decoded `message` field of the body.
    pub fn message(&self) -> Option<String> {
        self.body_field("message")
    }

    /// Decoded `error` field of the body.
    pub fn error(&self) -> Option<String> {
        self.body_field("error")
    }

    fn body_field(&self, name: &str) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        value.get(name)?.as_str().map(str::to_string)
    }
}
