use thiserror::Error;

/// Convenient result alias for the RAG Web Browser library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when caller-supplied parameters are malformed or missing.
    #[error("invalid parameter {name}: {message}")]
    Validation { name: String, message: String },

    /// Raised when a request uses any HTTP method other than GET.
    #[error("HTTP method {method} not supported")]
    UnsupportedMethod { method: String },

    /// Raised when the configured base URL cannot be parsed.
    #[error("invalid base URL {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// Raised when the upstream API answers with a non-success status.
    #[error("upstream returned HTTP {status}{}", format_upstream_message(.message))]
    UpstreamStatus {
        status: u16,
        message: Option<String>,
    },

    /// Raised when the upstream body is not a list of search results.
    #[error("failed to decode upstream response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Wrapper for HTTP client errors (DNS, connect, timeout, reset).
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Coarse classification used by adapters to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input parameters.
    Validation,
    /// Non-GET request.
    UnsupportedMethod,
    /// Network, timeout, non-2xx status, or undecodable body.
    Transport,
}

impl Error {
    pub fn validation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } | Error::InvalidBaseUrl { .. } => ErrorKind::Validation,
            Error::UnsupportedMethod { .. } => ErrorKind::UnsupportedMethod,
            Error::UpstreamStatus { .. } | Error::Decode(_) | Error::Http(_) => {
                ErrorKind::Transport
            }
        }
    }

    /// HTTP-equivalent status code for reporting this error to a caller.
    ///
    /// Only an unsupported method is the caller's fault; everything else
    /// reports as an internal error.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::UnsupportedMethod => 400,
            ErrorKind::Validation | ErrorKind::Transport => 500,
        }
    }

    /// True when the HTTP client gave up waiting for the upstream.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(err) if err.is_timeout())
    }
}

fn format_upstream_message(message: &Option<String>) -> String {
    match message {
        Some(message) if !message.trim().is_empty() => format!(": {}", message.trim()),
        _ => String::new(),
    }
}
