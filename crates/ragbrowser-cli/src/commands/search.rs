//! Search command handler for the standby client.

use std::io::{self, Write};

use anyhow::{Context, Result};

use ragbrowser_cli::output::{
    write_query_header, write_results_json, write_results_text, QueryResults,
};
use ragbrowser_lib::{ClientConfig, SearchRequest, SearchResult, StandbyClient};

use crate::OutputFormat;

/// Parsed `search` arguments.
#[derive(Debug)]
pub struct SearchArgs {
    pub queries: Vec<String>,
    pub max_results: i64,
    pub output_formats: String,
    pub request_timeout_secs: u64,
    pub dynamic_content_wait_secs: u64,
    pub preview_chars: usize,
    pub format: OutputFormat,
    pub strict: bool,
}

impl SearchArgs {
    fn request(&self, query: &str) -> SearchRequest {
        SearchRequest::new(query)
            .max_results(self.max_results)
            .output_formats(self.output_formats.as_str())
            .request_timeout_secs(self.request_timeout_secs)
            .dynamic_content_wait_secs(self.dynamic_content_wait_secs)
    }
}

/// Handle the search subcommand.
///
/// Without `--strict`, a failed query prints an empty listing and the command
/// still succeeds.
pub fn handle_search(config: ClientConfig, args: &SearchArgs) -> Result<()> {
    let client = StandbyClient::from_config(config).context("failed to build HTTP client")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut collected: Vec<(String, Vec<SearchResult>)> = Vec::with_capacity(args.queries.len());
    for query in &args.queries {
        if args.format == OutputFormat::Text {
            write_query_header(&mut out, query)?;
        }

        let results = if args.strict {
            client
                .try_search(&args.request(query))
                .with_context(|| format!("search failed for '{}'", query))?
        } else {
            client.search(
                query,
                args.max_results,
                &args.output_formats,
                args.request_timeout_secs,
                args.dynamic_content_wait_secs,
            )
        };

        match args.format {
            OutputFormat::Text => write_results_text(&mut out, &results, args.preview_chars)?,
            OutputFormat::Json => collected.push((query.clone(), results)),
        }
    }

    if args.format == OutputFormat::Json {
        let batches: Vec<QueryResults<'_>> = collected
            .iter()
            .map(|(query, results)| QueryResults { query, results })
            .collect();
        write_results_json(&mut out, &batches)?;
    }

    out.flush()?;
    Ok(())
}
