//! Client configuration.
//!
//! The base URL and credential are process-wide settings read once at startup
//! and passed explicitly into client constructors.

use std::env;
use std::time::Duration;

use reqwest::Url;
use tracing::warn;

use crate::error::{Error, Result};

/// Standby endpoint of the hosted RAG Web Browser actor.
pub const DEFAULT_BASE_URL: &str = "https://rag-web-browser.apify.actor";
/// Environment variable holding the bearer token.
pub const API_TOKEN_ENV: &str = "APIFY_API_TOKEN";
/// Optional environment override for the base URL.
pub const BASE_URL_ENV: &str = "RAG_WEB_BROWSER_BASE_URL";
/// HTTP timeout used when the request does not carry `requestTimeoutSecs`.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the upstream API.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    api_token: String,
    default_timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration for the default standby endpoint.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: api_token.into(),
            default_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the token and optional base URL override from the environment.
    ///
    /// A missing token is not an error: requests are sent with an empty
    /// bearer token and the upstream rejects them.
    pub fn from_env() -> Result<Self> {
        let api_token = match env::var(API_TOKEN_ENV) {
            Ok(token) => token,
            Err(_) => {
                warn!(
                    variable = API_TOKEN_ENV,
                    "API token not set; upstream calls will be rejected"
                );
                String::new()
            }
        };

        let config = Self::new(api_token);
        match env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => Ok(config),
        }
    }

    /// Point the client at a different host (trailing slashes are dropped).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self> {
        let raw = base_url.into();
        let parsed = Url::parse(&raw).map_err(|err| Error::InvalidBaseUrl {
            url: raw.clone(),
            message: err.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidBaseUrl {
                url: raw,
                message: "scheme must be http or https".to_string(),
            });
        }
        self.base_url = raw.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Timeout for requests that do not carry `requestTimeoutSecs`.
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Absolute URL for an API path such as `/search`.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field(
                "api_token",
                &if self.api_token.is_empty() {
                    "<unset>"
                } else {
                    "<redacted>"
                },
            )
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}
