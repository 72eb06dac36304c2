//! Typed schema for records returned by the upstream `/search` endpoint.
//!
//! Only `metadata` is required; every other field is optional so that partial
//! or failed crawls still deserialize. Fields this crate does not model are
//! kept in `extra` and serialized back out unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One crawled page returned by the upstream API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub metadata: ResultMetadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,

    /// Crawl bookkeeping (status, timing) for this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crawl: Option<CrawlInfo>,

    /// The organic search hit that led to this page, when the query was a
    /// search term rather than a URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_result: Option<OrganicResult>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResult {
    pub fn title(&self) -> &str {
        self.metadata.title.as_deref().unwrap_or_default()
    }

    pub fn url(&self) -> &str {
        self.metadata.url.as_deref().unwrap_or_default()
    }

    /// True when the upstream reported that crawling this page failed.
    pub fn is_failed(&self) -> bool {
        self.crawl
            .as_ref()
            .is_some_and(|crawl| crawl.request_status == Some(CrawlStatus::Failed))
    }
}

/// Page metadata extracted by the crawler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_status_message: Option<String>,
    /// ISO-8601 timestamp, kept as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_status: Option<CrawlStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStatus {
    Pending,
    Handled,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganicResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
