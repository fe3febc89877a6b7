//! Crawl run summary
//!
//! Condenses a [`CrawlReport`] into the handful of numbers worth showing after
//! a search, and prints them.

use crate::crawler::CrawlReport;
use std::collections::HashSet;

/// Summary statistics for one crawl session
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    pub request: String,
    pub expected_total: Option<u64>,
    pub collected: usize,
    pub unique_urls: usize,
    pub pages_fetched: usize,
    pub pages_admitted: usize,
    pub abandoned: usize,
    pub complete: bool,
    pub duration_ms: i64,
}

/// Builds the summary for a finished session
pub fn summarize(report: &CrawlReport) -> CrawlSummary {
    let unique_urls = report
        .entries
        .iter()
        .map(|entry| entry.url.as_str())
        .collect::<HashSet<_>>()
        .len();

    CrawlSummary {
        request: report.request.to_string(),
        expected_total: report.expected_total,
        collected: report.entries.len(),
        unique_urls,
        pages_fetched: report.pages_fetched,
        pages_admitted: report.pages_admitted,
        abandoned: report.abandoned.len(),
        complete: report.complete,
        duration_ms: report.duration().num_milliseconds(),
    }
}

/// Prints the summary to stdout
pub fn print_summary(report: &CrawlReport) {
    let summary = summarize(report);

    println!("=== Crawl Summary ===\n");
    println!("  Request: {}", summary.request);
    match summary.expected_total {
        Some(total) => println!("  Hosts reported: {}", total),
        None => println!("  Hosts reported: unknown"),
    }
    println!(
        "  Results collected: {} ({} unique URLs)",
        summary.collected, summary.unique_urls
    );
    println!(
        "  Pages fetched: {} of {} admitted",
        summary.pages_fetched, summary.pages_admitted
    );

    if summary.abandoned > 0 {
        println!("  Abandoned branches ({}):", summary.abandoned);
        for branch in &report.abandoned {
            println!("    - {} {}: {}", branch.branch, branch.request, branch.reason);
        }
    }

    println!("  Duration: {:.1}s", summary.duration_ms as f64 / 1000.0);

    if !summary.complete {
        println!("\n  Warning: result set is incomplete");
    }
}
