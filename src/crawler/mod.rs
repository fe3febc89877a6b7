//! Crawler module for result page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Fetching pages through the anonymizing proxy
//! - Pagination and result extraction
//! - Frontier deduplication of page requests
//! - Overall crawl coordination

mod coordinator;
mod document;
mod fetcher;
mod frontier;
mod pagination;
mod report;
mod results;

pub use coordinator::Coordinator;
pub use document::{Document, PageSelectors};
pub use fetcher::{build_http_client, Fetcher, ProxyFetcher};
pub use frontier::Frontier;
pub use pagination::{extract_links, PageLinks};
pub use report::{AbandonedBranch, BranchId, CrawlReport};
pub use results::{
    extract_results, extract_total, has_no_results, inspect_first_page, FirstPage, ResultEntry,
};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl for `query` against the configured endpoint
///
/// This is the main entry point for a search. It will:
/// 1. Build the proxied HTTP client
/// 2. Fetch the first result page and read the expected total
/// 3. Follow forward pagination links, each page at most once
/// 4. Collect result entries until the expected total is reached
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `query` - Search term or literal page path
pub async fn crawl(config: &Config, query: &str) -> Result<CrawlReport> {
    Coordinator::from_config(config)?.run(query).await
}
