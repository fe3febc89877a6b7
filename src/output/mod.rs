//! Output module for search results
//!
//! This module handles:
//! - Rendering result entries as human-readable blocks
//! - Writing results to a new file (never overwriting)
//! - Printing a short summary of the crawl session

mod summary;
mod text;

pub use summary::{print_summary, summarize, CrawlSummary};
pub use text::{format_results, print_results, write_results};
