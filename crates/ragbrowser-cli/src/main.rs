mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use ragbrowser_lib::config::{API_TOKEN_ENV, BASE_URL_ENV};
use ragbrowser_lib::params::{
    DEFAULT_DYNAMIC_CONTENT_WAIT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, MAX_RESULTS_CAP,
    REQUIRED_OUTPUT_FORMAT,
};
use ragbrowser_lib::ClientConfig;

use crate::commands::action::ActionArgs;
use crate::commands::search::SearchArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "RAG Web Browser standby API client")]
struct Cli {
    /// Override the standby API endpoint.
    #[arg(long, global = true, env = BASE_URL_ENV)]
    base_url: Option<String>,

    /// Bearer token for the standby API.
    #[arg(long, global = true, env = API_TOKEN_ENV, hide_env_values = true)]
    api_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the web (or fetch a URL) and print the results.
    Search {
        /// Search terms or URLs; each is sent as a separate request.
        #[arg(required = true, num_args = 1..)]
        queries: Vec<String>,
        /// Maximum number of results per query.
        #[arg(long, default_value_t = MAX_RESULTS_CAP, allow_negative_numbers = true)]
        max_results: i64,
        /// Comma-separated formats to request (text, markdown, html).
        #[arg(long, default_value = REQUIRED_OUTPUT_FORMAT)]
        output_formats: String,
        /// Upstream request timeout in seconds.
        #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
        request_timeout_secs: u64,
        /// Seconds to wait for dynamic page content.
        #[arg(long, default_value_t = DEFAULT_DYNAMIC_CONTENT_WAIT_SECS)]
        dynamic_content_wait_secs: u64,
        /// Characters of text shown per result.
        #[arg(long, default_value_t = 200)]
        preview_chars: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Fail on request errors instead of printing an empty listing.
        #[arg(long)]
        strict: bool,
    },
    /// Run an action-group event through the Lambda adapter locally.
    Action {
        /// Event JSON file; use '-' for stdin.
        #[arg(long, conflicts_with_all = ["query", "max_results"])]
        event: Option<std::path::PathBuf>,
        /// Build the event from this query instead of a file.
        #[arg(long, required_unless_present = "event")]
        query: Option<String>,
        /// `maxResults` parameter for the built event.
        #[arg(long)]
        max_results: Option<String>,
        /// HTTP method for the built event.
        #[arg(long, default_value = "GET")]
        method: String,
        /// Action group name for the built event.
        #[arg(long, default_value = commands::action::DEFAULT_ACTION_GROUP)]
        action_group: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();
    let config = client_config(cli.base_url.as_deref(), cli.api_token.as_deref())?;

    match cli.command {
        Command::Search {
            queries,
            max_results,
            output_formats,
            request_timeout_secs,
            dynamic_content_wait_secs,
            preview_chars,
            format,
            strict,
        } => commands::search::handle_search(
            config,
            &SearchArgs {
                queries,
                max_results,
                output_formats,
                request_timeout_secs,
                dynamic_content_wait_secs,
                preview_chars,
                format,
                strict,
            },
        ),
        Command::Action {
            event,
            query,
            max_results,
            method,
            action_group,
        } => commands::action::handle_action(
            config,
            &ActionArgs {
                event,
                query,
                max_results,
                method,
                action_group,
            },
        ),
    }
}

fn client_config(base_url: Option<&str>, api_token: Option<&str>) -> Result<ClientConfig> {
    let token = match api_token {
        Some(token) if !token.trim().is_empty() => token.trim().to_string(),
        _ => {
            warn!(
                variable = API_TOKEN_ENV,
                "API token not set; upstream calls will be rejected"
            );
            String::new()
        }
    };

    let config = ClientConfig::new(token);
    match base_url {
        Some(url) if !url.trim().is_empty() => config
            .with_base_url(url.trim())
            .with_context(|| format!("invalid --base-url {}", url)),
        _ => Ok(config),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
