//! Output formatting for search results.

use std::io::{self, Write};

use serde::Serialize;

use ragbrowser_lib::{preview, SearchResult};

/// Results of one query, as emitted by `--format json`.
#[derive(Debug, Serialize)]
pub struct QueryResults<'a> {
    pub query: &'a str,
    pub results: &'a [SearchResult],
}

/// Header printed before each query's results.
pub fn write_query_header<W: Write>(out: &mut W, query: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Searching for: {}", query)
}

/// Human-readable listing: title, URL and a text preview per result.
pub fn write_results_text<W: Write>(
    out: &mut W,
    results: &[SearchResult],
    preview_chars: usize,
) -> io::Result<()> {
    if results.is_empty() {
        writeln!(out)?;
        return writeln!(out, "No results.");
    }

    for (i, result) in results.iter().enumerate() {
        writeln!(out)?;
        writeln!(out, "Result {}:", i + 1)?;
        writeln!(out, "Title: {}", result.title())?;
        writeln!(out, "URL: {}", result.url())?;
        if result.is_failed() {
            writeln!(out, "Status: failed")?;
        }
        writeln!(out, "Content preview: {}", preview(result, preview_chars))?;
    }
    Ok(())
}

/// Pretty JSON array of `{query, results}` objects.
pub fn write_results_json<W: Write>(out: &mut W, batches: &[QueryResults<'_>]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, batches)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragbrowser_lib::{CrawlInfo, CrawlStatus, ResultMetadata};

    fn result(title: &str, text: Option<&str>) -> SearchResult {
        SearchResult {
            metadata: ResultMetadata {
                title: Some(title.to_string()),
                url: Some("https://www.example.com/".to_string()),
                ..ResultMetadata::default()
            },
            text: text.map(str::to_string),
            ..SearchResult::default()
        }
    }

    fn render_text(results: &[SearchResult], preview_chars: usize) -> String {
        let mut out = Vec::new();
        write_results_text(&mut out, results, preview_chars).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_listing_numbers_results() {
        let text = render_text(
            &[
                result("Example Domain", Some("This domain is for use in examples.")),
                result("Second", None),
            ],
            12,
        );

        assert!(text.contains("Result 1:\nTitle: Example Domain\nURL: https://www.example.com/\n"));
        assert!(text.contains("Content preview: This domain ...\n"));
        assert!(text.contains("Result 2:\nTitle: Second\n"));
        assert!(text.contains("Content preview: N/A...\n"));
    }

    #[test]
    fn failed_crawls_are_flagged() {
        let mut failed = result("Broken", Some(""));
        failed.crawl = Some(CrawlInfo {
            request_status: Some(CrawlStatus::Failed),
            ..CrawlInfo::default()
        });

        let text = render_text(&[failed], 200);
        assert!(text.contains("Status: failed"));
    }

    #[test]
    fn empty_listing_says_so() {
        assert_eq!(render_text(&[], 200), "\nNo results.\n");
    }

    #[test]
    fn json_output_groups_by_query() {
        let results = vec![result("Example Domain", None)];
        let batches = [QueryResults {
            query: "https://www.example.com",
            results: &results,
        }];

        let mut out = Vec::new();
        write_results_json(&mut out, &batches).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["query"], "https://www.example.com");
        assert_eq!(value[0]["results"][0]["metadata"]["title"], "Example Domain");
    }
}
