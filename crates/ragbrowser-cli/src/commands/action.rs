//! Action command handler: runs one action-group event through the Lambda
//! adapter in-process and prints the envelope it returns.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use ragbrowser_lambda_search::handle_action as run_action;
use ragbrowser_lambda_shared::{ActionGroupEvent, ActionParameter};
use ragbrowser_lib::client::SEARCH_PATH;
use ragbrowser_lib::params::{MAX_RESULTS, QUERY};
use ragbrowser_lib::{ClientConfig, RagWebBrowserClient};

/// Action group name used when building an event from flags.
pub const DEFAULT_ACTION_GROUP: &str = "action-call-rag-web-browser";

/// Parsed `action` arguments.
#[derive(Debug)]
pub struct ActionArgs {
    pub event: Option<PathBuf>,
    pub query: Option<String>,
    pub max_results: Option<String>,
    pub method: String,
    pub action_group: String,
}

/// Handle the action subcommand.
///
/// The envelope is printed either way; a non-200 status also fails the command.
pub fn handle_action(config: ClientConfig, args: &ActionArgs) -> Result<()> {
    let event = match &args.event {
        Some(path) => load_event(path)?,
        None => event_from_flags(args)?,
    };

    let client = RagWebBrowserClient::new(config).context("failed to build HTTP client")?;
    let request_id = format!("cli-{}", std::process::id());
    let response = run_action(&event, &client, &request_id);

    println!(
        "{}",
        serde_json::to_string_pretty(&response).context("failed to encode response")?
    );

    let status = response.status_code();
    if status != 200 {
        bail!("action returned status {}", status);
    }
    Ok(())
}

fn load_event(path: &Path) -> Result<ActionGroupEvent> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read event from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path.display()))?
    };

    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not an action-group event", path.display()))
}

fn event_from_flags(args: &ActionArgs) -> Result<ActionGroupEvent> {
    let Some(query) = args.query.as_deref() else {
        bail!("either --event or --query is required");
    };

    let mut parameters = vec![ActionParameter::new(QUERY, "string", query)];
    if let Some(max_results) = args.max_results.as_deref() {
        parameters.push(ActionParameter::new(MAX_RESULTS, "integer", max_results));
    }

    Ok(ActionGroupEvent {
        api_path: SEARCH_PATH.to_string(),
        http_method: args.method.clone(),
        parameters,
        action_group: args.action_group.clone(),
        message_version: "1.0".to_string(),
        agent: None,
        session_id: None,
        input_text: None,
    })
}
