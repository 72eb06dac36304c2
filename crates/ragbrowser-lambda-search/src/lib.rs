//! AWS Lambda action-group function for RAG Web Browser search.
//!
//! The agent platform sends an [`ActionGroupEvent`]; the function forwards the
//! normalized parameters to the standby API and answers with the markdown of
//! each result, truncated and joined into a single body.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use ragbrowser_lambda_shared::{
    get_runtime, ActionGroupEvent, ActionGroupResponse, ErrorResponse, Validate,
};
use ragbrowser_lib::params::{MAX_RESULTS, OUTPUT_FORMATS, QUERY};
use ragbrowser_lib::shape::{exceeds_response_limit, RESPONSE_SIZE_LIMIT_BYTES};
use ragbrowser_lib::{normalize, shape_markdown_bodies, SearchBackend};

/// Lambda response - either the success envelope or `{statusCode, body}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success(ActionGroupResponse),
    Error(ErrorResponse),
}

impl Response {
    /// HTTP-equivalent status of this outcome.
    pub fn status_code(&self) -> u16 {
        match self {
            Response::Success(success) => success.response.http_status_code,
            Response::Error(err) => err.status_code,
        }
    }
}

/// Event loop used by the Lambda binary.
///
/// The runtime must already be initialized: the HTTP client is blocking and
/// has to be built outside the async executor.
pub async fn run() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handler)).await
}

/// Lambda handler invoked per request. Never returns `Err`.
pub async fn handler(event: LambdaEvent<Value>) -> Result<Response, Error> {
    let request_id = event.context.request_id.clone();

    let action: ActionGroupEvent = match serde_json::from_value(event.payload) {
        Ok(action) => action,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "failed to parse action-group event");
            return Ok(Response::Error(ErrorResponse::internal_error(format!(
                "malformed action-group event: {}",
                e
            ))));
        }
    };

    let backend = match get_runtime() {
        Ok(runtime) => runtime.backend(),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "runtime unavailable");
            return Ok(Response::Error(e.to_response()));
        }
    };

    let task_request_id = request_id.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        handle_action(&action, backend.as_ref(), &task_request_id)
    })
    .await;

    match outcome {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "search task did not complete");
            Ok(Response::Error(ErrorResponse::internal_error(e)))
        }
    }
}

/// Core handler logic: validate, normalize, call upstream, shape, wrap.
///
/// Blocking. Every failure is turned into an error envelope.
pub fn handle_action(
    event: &ActionGroupEvent,
    backend: &dyn SearchBackend,
    request_id: &str,
) -> Response {
    if let Err(problem) = event.validate() {
        warn!(
            request_id = %request_id,
            http_method = %event.http_method,
            api_path = %event.api_path,
            "rejected action-group request"
        );
        return Response::Error(*problem);
    }

    let method = match event.method() {
        Ok(method) => method,
        Err(e) => return Response::Error(ErrorResponse::from_error(&e)),
    };

    let params = match normalize(&event.query_parameters()) {
        Ok(params) => params,
        Err(e) => {
            warn!(request_id = %request_id, error = %e, "invalid action-group parameters");
            return Response::Error(ErrorResponse::from_error(&e));
        }
    };

    info!(
        request_id = %request_id,
        action_group = %event.action_group,
        query = params.get(QUERY).unwrap_or_default(),
        max_results = params.get(MAX_RESULTS).unwrap_or_default(),
        output_formats = params.get(OUTPUT_FORMATS).unwrap_or_default(),
        "handling search request"
    );

    let results = match backend.invoke(&method, &event.api_path, &params) {
        Ok(results) => results,
        Err(e) => {
            error!(
                request_id = %request_id,
                error = %e,
                timeout = e.is_timeout(),
                "upstream search failed"
            );
            return Response::Error(ErrorResponse::from_error(&e));
        }
    };

    let body = shape_markdown_bodies(&results);
    if exceeds_response_limit(&body) {
        warn!(
            request_id = %request_id,
            body_bytes = body.len(),
            limit_bytes = RESPONSE_SIZE_LIMIT_BYTES,
            "shaped body exceeds the agent response limit"
        );
    }

    info!(
        request_id = %request_id,
        results = results.len(),
        body_bytes = body.len(),
        "search completed"
    );

    Response::Success(ActionGroupResponse::success(event, body))
}
