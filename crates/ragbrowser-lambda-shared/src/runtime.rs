//! Process-wide search backend, configured once at cold start.
//!
//! The HTTP client and its connection pool are built during initialization and
//! reused across every invocation handled by the same execution environment.
//!
//! # Cold-Start Performance
//!
//! Initialization logs `init_ms` so slow starts show up in CloudWatch.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use tracing::{error, info};

use ragbrowser_lib::{ClientConfig, Error as LibError, RagWebBrowserClient, SearchBackend};

use crate::ErrorResponse;

/// Lazily-initialized Lambda runtime state.
static RUNTIME: OnceLock<Result<LambdaRuntime, InitError>> = OnceLock::new();

/// Error during runtime initialization.
#[derive(Debug, Clone)]
pub struct InitError {
    pub message: String,
}

impl std::fmt::Display for InitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Lambda initialization failed: {}", self.message)
    }
}

impl std::error::Error for InitError {}

impl From<LibError> for InitError {
    fn from(err: LibError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl InitError {
    /// 500 envelope reported by every invocation after a failed cold start.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse::internal_error(self)
    }
}

/// Shared state for all invocations.
pub struct LambdaRuntime {
    backend: Arc<dyn SearchBackend>,
}

impl LambdaRuntime {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Build the HTTP backend from `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self, InitError> {
        info!(base_url = %config.base_url(), "configuring RAG Web Browser client");
        let client = RagWebBrowserClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Build the HTTP backend from the process environment.
    pub fn from_env() -> Result<Self, InitError> {
        Self::from_config(ClientConfig::from_env()?)
    }

    pub fn backend(&self) -> Arc<dyn SearchBackend> {
        Arc::clone(&self.backend)
    }
}

/// Initialize the runtime with `build`, once per process.
///
/// Later calls return the first outcome without running `build` again. A
/// failed initialization is kept so each invocation can report it.
pub fn init_runtime<F>(build: F) -> Result<&'static LambdaRuntime, InitError>
where
    F: FnOnce() -> Result<LambdaRuntime, InitError>,
{
    let result = RUNTIME.get_or_init(|| {
        let start = Instant::now();
        info!("initializing Lambda runtime");

        let result = build();
        let init_ms = start.elapsed().as_millis();
        match &result {
            Ok(_) => info!(init_ms = init_ms, "Lambda runtime initialization complete"),
            Err(e) => error!(init_ms = init_ms, error = %e, "Lambda runtime initialization failed"),
        }
        result
    });

    result.as_ref().map_err(Clone::clone)
}

/// The initialized runtime.
pub fn get_runtime() -> Result<&'static LambdaRuntime, InitError> {
    match RUNTIME.get() {
        Some(result) => result.as_ref().map_err(Clone::clone),
        None => Err(InitError {
            message: "runtime not initialized; call init_runtime() first".to_string(),
        }),
    }
}
