//! Tracing initialization for Lambda functions.
//!
//! Events are written as flattened JSON lines, which CloudWatch Logs Insights
//! can query field by field. Set `LOG_FORMAT=text` for plain lines when
//! running the function locally.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable selecting the log line format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Json,
    Text,
}

impl LogFormat {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => LogFormat::Text,
            _ => LogFormat::Json,
        }
    }
}

/// Initialize tracing for the Lambda process.
///
/// Call once at the top of `main`, before the runtime is initialized, so
/// cold-start timings are captured. `RUST_LOG` controls the level (default
/// `info`). A second call is a no-op.
///
/// # Example
///
/// ```no_run
/// use ragbrowser_lambda_shared::init_tracing;
///
/// fn main() {
///     init_tracing();
///     // ... initialize the runtime and start the event loop
/// }
/// ```
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let format = std::env::var(LOG_FORMAT_ENV)
        .map(|v| LogFormat::parse(&v))
        .unwrap_or(LogFormat::Json);

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(false)
                    .with_span_list(false)
                    .flatten_event(true),
            )
            .try_init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_ansi(false))
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
