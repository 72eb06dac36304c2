//! Action-group invocation payload and its validation.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use ragbrowser_lib::{Error as LibError, QueryParameters};

use crate::ErrorResponse;

/// Validation trait for Lambda request types.
///
/// Implementations should check everything that can be rejected before any
/// upstream call is made and return the error envelope to send back.
pub trait Validate {
    /// Returns a boxed `ErrorResponse` to avoid large `Result::Err` variants.
    fn validate(&self) -> Result<(), Box<ErrorResponse>>;
}

/// Event sent by the agent platform when it invokes an action-group API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupEvent {
    /// API path from the action group's OpenAPI schema, e.g. `/search`.
    pub api_path: String,

    /// HTTP method from the OpenAPI schema.
    pub http_method: String,

    /// Parameters the agent filled in.
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,

    /// Name of the invoking action group; echoed back in the response.
    pub action_group: String,

    /// Envelope version; echoed back in the response.
    pub message_version: String,

    /// Agent description (string or object depending on the caller).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_text: Option<String>,
}

/// One `{name, type, value}` parameter of an action-group event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,

    /// OpenAPI type hint (`string`, `integer`, ...). Informational only.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,

    #[serde(default)]
    pub value: Value,
}

impl ActionParameter {
    pub fn new(name: impl Into<String>, param_type: &str, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            param_type: Some(param_type.to_string()),
            value: value.into(),
        }
    }

    /// Wire form of the value: strings as-is, other JSON values as their JSON
    /// text. `null` yields `None`.
    pub fn value_as_string(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl ActionGroupEvent {
    /// Parameters as a name/value map. Later duplicates win; `null` values
    /// are dropped.
    pub fn query_parameters(&self) -> QueryParameters {
        self.parameters
            .iter()
            .filter_map(|param| param.value_as_string().map(|value| (param.name.as_str(), value)))
            .collect()
    }

    /// The requested method, if it is the supported one.
    pub fn method(&self) -> Result<Method, LibError> {
        let unsupported = || LibError::UnsupportedMethod {
            method: self.http_method.clone(),
        };
        let method = Method::from_bytes(self.http_method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|_| unsupported())?;
        if method == Method::GET {
            Ok(method)
        } else {
            Err(unsupported())
        }
    }
}

impl Validate for ActionGroupEvent {
    fn validate(&self) -> Result<(), Box<ErrorResponse>> {
        if let Err(err) = self.method() {
            return Err(Box::new(ErrorResponse::from_error(&err)));
        }

        if !self.api_path.starts_with('/') {
            return Err(Box::new(ErrorResponse::internal_error(
                "The 'apiPath' field must be an absolute path such as /search",
            )));
        }

        Ok(())
    }
}
