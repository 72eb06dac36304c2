//! AWS Lambda binary for the RAG Web Browser action group.
//!
//! # Environment
//!
//! - `APIFY_API_TOKEN` - Bearer token for the standby API
//! - `RAG_WEB_BROWSER_BASE_URL` - Optional endpoint override
//! - `RUST_LOG` - Log level filter (default: info)
//! - `LOG_FORMAT` - json (default) or text

use lambda_runtime::Error;

use ragbrowser_lambda_shared::{init_runtime, init_tracing, LambdaRuntime};

fn main() -> Result<(), Error> {
    init_tracing();

    // The blocking HTTP client must be built before the async runtime exists.
    // A failed init is reported by every invocation instead of aborting.
    let _ = init_runtime(LambdaRuntime::from_env);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(ragbrowser_lambda_search::run())
}
