//! Query parameters for the upstream `/search` endpoint and their normalization.

use std::collections::BTreeMap;
use std::fmt;
use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const QUERY: &str = "query";
pub const MAX_RESULTS: &str = "maxResults";
pub const OUTPUT_FORMATS: &str = "outputFormats";
pub const REQUEST_TIMEOUT_SECS: &str = "requestTimeoutSecs";
pub const DYNAMIC_CONTENT_WAIT_SECS: &str = "dynamicContentWaitSecs";

/// Hard cap on results; keeps the action-group response under 25 KB.
pub const MAX_RESULTS_CAP: i64 = 3;
/// Output format that must always be requested.
pub const REQUIRED_OUTPUT_FORMAT: &str = "markdown";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upper bound for the local HTTP timeout; the upstream accepts at most 300.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_DYNAMIC_CONTENT_WAIT_SECS: u64 = 10;

/// Name/value pairs forwarded to the upstream API as a query string.
///
/// Values are kept in their wire form. Iteration is ordered by name so the
/// encoded query string is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParameters(BTreeMap<String, String>);

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter.
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.insert(name.into(), value.to_string());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse `maxResults`, if present. Out-of-range integers saturate.
    pub fn max_results(&self) -> Result<Option<i64>> {
        self.get(MAX_RESULTS)
            .map(|raw| parse_integer(MAX_RESULTS, raw))
            .transpose()
    }

    /// `requestTimeoutSecs` when it is a positive integer, clamped to
    /// [`MAX_REQUEST_TIMEOUT_SECS`]. Anything else is left for the upstream to
    /// judge.
    pub fn request_timeout_secs(&self) -> Option<u64> {
        self.get(REQUEST_TIMEOUT_SECS)
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) => Some(secs),
                Err(err) if *err.kind() == IntErrorKind::PosOverflow => Some(u64::MAX),
                Err(_) => None,
            })
            .filter(|secs| *secs > 0)
            .map(|secs| secs.min(MAX_REQUEST_TIMEOUT_SECS))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for QueryParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParameters::new();
        for (name, value) in iter {
            params.set(name, value);
        }
        params
    }
}

fn parse_integer(name: &str, raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) => Ok(value),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(Error::validation(name, format!("expected an integer, got '{}'", raw))),
        },
    }
}

/// Produce a parameter set that is safe to forward upstream.
///
/// - `query` must be present and non-blank.
/// - `maxResults` becomes `min(value, 3)`, defaulting to 3.
/// - `outputFormats` always contains `markdown` exactly once.
///
/// Every other parameter passes through unchanged. The function is pure and
/// idempotent.
pub fn normalize(params: &QueryParameters) -> Result<QueryParameters> {
    match params.get(QUERY) {
        Some(query) if !query.trim().is_empty() => {}
        _ => return Err(Error::validation(QUERY, "must be provided and non-empty")),
    }

    let max_results = params
        .max_results()?
        .unwrap_or(MAX_RESULTS_CAP)
        .min(MAX_RESULTS_CAP);

    let requested = params.get(OUTPUT_FORMATS).unwrap_or(REQUIRED_OUTPUT_FORMAT);
    let formats = OutputFormats::parse(requested).with_required();

    let mut normalized = params.clone();
    normalized.set(MAX_RESULTS, max_results);
    normalized.set(OUTPUT_FORMATS, formats);
    Ok(normalized)
}

/// Comma-separated set of requested output formats (`text`, `markdown`, `html`).
///
/// Segments are trimmed, empty segments dropped, and duplicates collapsed while
/// keeping the first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFormats(Vec<String>);

impl OutputFormats {
    pub fn parse(raw: &str) -> Self {
        let mut formats: Vec<String> = Vec::new();
        for segment in raw.split(',') {
            let segment = segment.trim();
            if !segment.is_empty() && !formats.iter().any(|f| f == segment) {
                formats.push(segment.to_string());
            }
        }
        Self(formats)
    }

    /// Append `markdown` unless it is already requested.
    pub fn with_required(mut self) -> Self {
        if !self.contains(REQUIRED_OUTPUT_FORMAT) {
            self.0.push(REQUIRED_OUTPUT_FORMAT.to_string());
        }
        self
    }

    pub fn contains(&self, format: &str) -> bool {
        self.0.iter().any(|f| f == format)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for OutputFormats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// Typed search request used by the standalone client.
///
/// See <https://apify.com/apify/rag-web-browser#query-parameters> for the
/// meaning of each field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub max_results: i64,
    pub output_formats: String,
    pub request_timeout_secs: u64,
    pub dynamic_content_wait_secs: u64,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: MAX_RESULTS_CAP,
            output_formats: REQUIRED_OUTPUT_FORMAT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            dynamic_content_wait_secs: DEFAULT_DYNAMIC_CONTENT_WAIT_SECS,
        }
    }

    pub fn max_results(mut self, max_results: i64) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn output_formats(mut self, output_formats: impl Into<String>) -> Self {
        self.output_formats = output_formats.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn dynamic_content_wait_secs(mut self, secs: u64) -> Self {
        self.dynamic_content_wait_secs = secs;
        self
    }

    pub fn to_query_parameters(&self) -> QueryParameters {
        QueryParameters::new()
            .with(QUERY, &self.query)
            .with(MAX_RESULTS, self.max_results)
            .with(OUTPUT_FORMATS, &self.output_formats)
            .with(REQUEST_TIMEOUT_SECS, self.request_timeout_secs)
            .with(DYNAMIC_CONTENT_WAIT_SECS, self.dynamic_content_wait_secs)
    }
}
