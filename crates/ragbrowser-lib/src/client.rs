//! Blocking HTTP client for the RAG Web Browser standby API.
//!
//! Every call is a single GET with no retries: a failed request is reported to
//! the caller immediately.

use std::time::Duration;

use http::Method;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::model::SearchResult;
use crate::params::{QueryParameters, SearchRequest};

/// Path of the upstream search endpoint.
pub const SEARCH_PATH: &str = "/search";

/// Longest upstream error text carried into an [`Error::UpstreamStatus`].
const MAX_ERROR_MESSAGE_CHARS: usize = 300;

/// Anything that can answer a search against the upstream API.
///
/// Adapters depend on this trait rather than on [`RagWebBrowserClient`] so
/// they can be exercised without a network.
pub trait SearchBackend: Send + Sync {
    /// Issue `method path?params` and decode the result list.
    fn invoke(
        &self,
        method: &Method,
        path: &str,
        params: &QueryParameters,
    ) -> Result<Vec<SearchResult>>;

    /// `GET /search` with `params`.
    fn search(&self, params: &QueryParameters) -> Result<Vec<SearchResult>> {
        self.invoke(&Method::GET, SEARCH_PATH, params)
    }
}

/// Upstream invoker backed by `reqwest`'s blocking client.
#[derive(Debug, Clone)]
pub struct RagWebBrowserClient {
    config: ClientConfig,
    http: Client,
}

impl RagWebBrowserClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(user_agent())
            .build()
            .map_err(Error::Http)?;
        Ok(Self { config, http })
    }

    fn timeout_for(&self, params: &QueryParameters) -> Duration {
        params
            .request_timeout_secs()
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.config.default_timeout())
    }
}

impl SearchBackend for RagWebBrowserClient {
    fn invoke(
        &self,
        method: &Method,
        path: &str,
        params: &QueryParameters,
    ) -> Result<Vec<SearchResult>> {
        if *method != Method::GET {
            return Err(Error::UnsupportedMethod {
                method: method.to_string(),
            });
        }

        let url = self.config.endpoint(path);
        let timeout = self.timeout_for(params);
        debug!(url = %url, params = ?params, timeout_secs = timeout.as_secs(), "GET request");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.config.api_token())
            .header(ACCEPT, "application/json")
            .query(params)
            .timeout(timeout)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        let body = response.text()?;
        let results: Vec<SearchResult> = serde_json::from_str(&body)?;
        info!(
            url = %url,
            status = status.as_u16(),
            results = results.len(),
            body_bytes = body.len(),
            "received response from RAG Web Browser"
        );
        Ok(results)
    }
}

fn user_agent() -> String {
    format!(
        "ragbrowser-lib/{version} ({repo})",
        version = env!("CARGO_PKG_VERSION"),
        repo = "https://github.com/scetrov/ragbrowser-rs"
    )
}

/// Pull a human-readable message out of an upstream error body.
///
/// Prefers a JSON `message` (or `error.message`) field and falls back to the
/// raw text.
fn upstream_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .get("message")
            .or_else(|| value.get("error").and_then(|e| e.get("message")))
            .and_then(Value::as_str);
        if let Some(message) = message {
            return Some(message.to_string());
        }
    }

    Some(trimmed.chars().take(MAX_ERROR_MESSAGE_CHARS).collect())
}

/// Standalone client for direct calls in standby mode.
///
/// [`StandbyClient::try_search`] reports failures; [`StandbyClient::search`]
/// keeps the list-only contract and returns an empty list instead.
#[derive(Debug, Clone)]
pub struct StandbyClient {
    inner: RagWebBrowserClient,
}

impl StandbyClient {
    /// Client for the default standby endpoint.
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(api_token))
    }

    pub fn from_config(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            inner: RagWebBrowserClient::new(config)?,
        })
    }

    /// Search and surface any failure to the caller.
    ///
    /// Parameters are forwarded as given; the result-count cap only applies to
    /// the action-group adapter.
    pub fn try_search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>> {
        self.inner.search(&request.to_query_parameters())
    }

    /// Search, returning an empty list when the request fails.
    ///
    /// An empty list is ambiguous (no results, or a failed request); use
    /// [`StandbyClient::try_search`] to tell them apart.
    pub fn search(
        &self,
        query: &str,
        max_results: i64,
        output_formats: &str,
        request_timeout_secs: u64,
        dynamic_content_wait_secs: u64,
    ) -> Vec<SearchResult> {
        let request = SearchRequest::new(query)
            .max_results(max_results)
            .output_formats(output_formats)
            .request_timeout_secs(request_timeout_secs)
            .dynamic_content_wait_secs(dynamic_content_wait_secs);

        match self.try_search(&request) {
            Ok(results) => results,
            Err(err) => {
                error!(query = %query, error = %err, "error making request");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{
        normalize, MAX_REQUEST_TIMEOUT_SECS, MAX_RESULTS, OUTPUT_FORMATS, QUERY,
        REQUEST_TIMEOUT_SECS,
    };
    use crate::test_utils::{sample_results_json, StubReply, StubServer};

    fn client_for(server: &StubServer) -> RagWebBrowserClient {
        let config = ClientConfig::new("test-token")
            .with_base_url(server.base_url())
            .expect("stub URL is valid");
        RagWebBrowserClient::new(config).expect("client builds")
    }

    fn standby_for(base_url: &str) -> StandbyClient {
        let config = ClientConfig::new("test-token")
            .with_base_url(base_url)
            .expect("stub URL is valid");
        StandbyClient::from_config(config).expect("client builds")
    }

    #[test]
    fn sends_bearer_token_and_encoded_query() {
        let server = StubServer::json(200, sample_results_json().to_string());
        let client = client_for(&server);

        let params = normalize(
            &QueryParameters::new()
                .with(QUERY, "AI agents in healthcare")
                .with(MAX_RESULTS, "5")
                .with(OUTPUT_FORMATS, "text"),
        )
        .unwrap();
        let results = client.search(&params).expect("search succeeds");
        assert_eq!(results.len(), 2);

        let request = server.next_request().expect("request captured");
        assert_eq!(request.method, "GET");
        assert_eq!(request.path(), "/search");
        assert_eq!(request.header("authorization"), Some("Bearer test-token"));
        let query = request.query_pairs();
        assert_eq!(query.get("query").map(String::as_str), Some("AI agents in healthcare"));
        assert_eq!(query.get("maxResults").map(String::as_str), Some("3"));
        assert_eq!(query.get("outputFormats").map(String::as_str), Some("text,markdown"));
    }

    #[test]
    fn rejects_non_get_without_calling_upstream() {
        let server = StubServer::json(200, "[]");
        let client = client_for(&server);

        let err = client
            .invoke(&Method::POST, SEARCH_PATH, &QueryParameters::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedMethod { ref method } if method == "POST"));
        assert!(server.next_request().is_none());
    }

    #[test]
    fn non_success_status_is_reported_with_message() {
        let server = StubServer::json(401, r#"{"message":"Unauthorized token"}"#);
        let client = client_for(&server);

        let err = client
            .search(&QueryParameters::new().with(QUERY, "x"))
            .unwrap_err();
        match err {
            Error::UpstreamStatus { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message.as_deref(), Some("Unauthorized token"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_error_message_is_extracted() {
        assert_eq!(
            upstream_message(r#"{"error":{"type":"rate-limit","message":"Slow down"}}"#).as_deref(),
            Some("Slow down")
        );
        assert_eq!(upstream_message("  Bad Gateway \n").as_deref(), Some("Bad Gateway"));
        assert_eq!(upstream_message(""), None);
    }

    #[test]
    fn undecodable_body_is_a_decode_error() {
        let server = StubServer::json(200, r#"{"message":"not a list"}"#);
        let client = client_for(&server);

        let err = client
            .search(&QueryParameters::new().with(QUERY, "x"))
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn stalled_upstream_times_out() {
        let server = StubServer::start(vec![StubReply::Stall(Duration::from_secs(3))]);
        let client = client_for(&server);

        let params = QueryParameters::new()
            .with(QUERY, "x")
            .with("requestTimeoutSecs", "1");
        let err = client.search(&params).unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }

    #[test]
    fn missing_request_timeout_uses_configured_default() {
        let config = ClientConfig::new("test-token").with_default_timeout(Duration::from_secs(7));
        let client = RagWebBrowserClient::new(config).expect("client builds");

        let params = QueryParameters::new().with(QUERY, "x");
        assert_eq!(client.timeout_for(&params), Duration::from_secs(7));

        let params = params.with(REQUEST_TIMEOUT_SECS, "0");
        assert_eq!(client.timeout_for(&params), Duration::from_secs(7));
    }

    #[test]
    fn configured_default_timeout_applies_to_stalled_upstream() {
        let server = StubServer::start(vec![StubReply::Stall(Duration::from_secs(3))]);
        let config = ClientConfig::new("test-token")
            .with_base_url(server.base_url())
            .expect("stub URL is valid")
            .with_default_timeout(Duration::from_secs(1));
        let client = RagWebBrowserClient::new(config).expect("client builds");

        let err = client
            .search(&QueryParameters::new().with(QUERY, "x"))
            .unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err:?}");
    }

    #[test]
    fn huge_request_timeout_is_clamped() {
        let server = StubServer::json(200, "[]");
        let client = client_for(&server);

        let params = QueryParameters::new()
            .with(QUERY, "x")
            .with(REQUEST_TIMEOUT_SECS, u64::MAX);
        assert_eq!(
            client.timeout_for(&params),
            Duration::from_secs(MAX_REQUEST_TIMEOUT_SECS)
        );

        let results = client.search(&params).expect("search succeeds");
        assert!(results.is_empty());
        let request = server.next_request().expect("request captured");
        assert_eq!(
            request.query_pairs().get(REQUEST_TIMEOUT_SECS).map(String::as_str),
            Some("18446744073709551615")
        );
    }

    #[test]
    fn standby_search_with_huge_timeout_succeeds() {
        let server = StubServer::json(200, sample_results_json().to_string());
        let client = standby_for(server.base_url());

        let request = SearchRequest::new("x").request_timeout_secs(u64::MAX);
        let results = client.try_search(&request).expect("search succeeds");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn standby_search_returns_results() {
        let server = StubServer::json(200, sample_results_json().to_string());
        let client = standby_for(server.base_url());

        let results = client.search("https://www.example.com", 2, "text,markdown", 45, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title(), "Example Domain");

        let request = server.next_request().expect("request captured");
        let query = request.query_pairs();
        assert_eq!(query.get("maxResults").map(String::as_str), Some("2"));
        assert_eq!(query.get("requestTimeoutSecs").map(String::as_str), Some("45"));
        assert_eq!(query.get("dynamicContentWaitSecs").map(String::as_str), Some("10"));
    }

    #[test]
    fn standby_search_swallows_failures() {
        let failure = || StubReply::Json {
            status: 500,
            body: r#"{"message":"boom"}"#.to_string(),
        };
        let server = StubServer::start(vec![failure(), failure()]);
        let client = standby_for(server.base_url());
        assert!(client.search("anything", 3, "markdown", 30, 10).is_empty());

        let err = client
            .try_search(&SearchRequest::new("anything"))
            .unwrap_err();
        assert!(matches!(err, Error::UpstreamStatus { status: 500, .. }));
    }

    #[test]
    fn standby_search_returns_empty_on_timeout() {
        let server = StubServer::start(vec![StubReply::Stall(Duration::from_secs(3))]);
        let client = standby_for(server.base_url());
        assert!(client.search("slow", 3, "markdown", 1, 0).is_empty());
    }

    #[test]
    fn unreachable_upstream_is_a_transport_error() {
        let client = standby_for(&StubServer::unreachable_url());
        let err = client.try_search(&SearchRequest::new("x")).unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert_eq!(err.status_code(), 500);
    }
}
