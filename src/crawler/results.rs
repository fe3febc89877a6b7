//! Result extractor
//!
//! Pulls structured result entries, the reported total and the "no results"
//! marker out of a result page.

use crate::crawler::document::{element_text, Document, PageSelectors};
use scraper::Html;
use std::fmt;

/// One search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Address of the result; identifies the entry
    pub url: String,

    /// Display title
    pub title: String,

    /// Text snippet shown under the title
    pub snippet: String,
}

impl fmt::Display for ResultEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "URL: {}", self.url)?;
        writeln!(f, "Title: {}", self.title)?;
        write!(f, "Snippet: {}", self.snippet)
    }
}

/// What the first page of a session says about the whole search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstPage {
    /// The page shows the "no results" marker
    pub no_results: bool,

    /// Result count reported by the site, if the marker could be read
    pub total: Option<u64>,
}

/// Reads the no-results marker and the reported total with a single parse
pub fn inspect_first_page(doc: &Document, selectors: &PageSelectors) -> FirstPage {
    let html = doc.html();
    FirstPage {
        no_results: no_results_in(&html, selectors),
        total: total_in(&html, selectors),
    }
}

/// Returns true if the page carries the "no results" marker
pub fn has_no_results(doc: &Document, selectors: &PageSelectors) -> bool {
    no_results_in(&doc.html(), selectors)
}

/// Reads the total result count reported by the page
///
/// Digits are collected from the marker text, so `"1,204 results"` reads as 1204.
pub fn extract_total(doc: &Document, selectors: &PageSelectors) -> Option<u64> {
    total_in(&doc.html(), selectors)
}

/// Extracts all result entries on a page, in page order
///
/// A page with the "no results" marker yields nothing. Blocks without a
/// usable URL are skipped.
pub fn extract_results(doc: &Document, selectors: &PageSelectors) -> Vec<ResultEntry> {
    let html = doc.html();

    if no_results_in(&html, selectors) {
        return Vec::new();
    }

    let mut entries = Vec::new();
    for block in html.select(&selectors.result) {
        let link = block.select(&selectors.result_url).next();

        let url = link
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty())
            .or_else(|| link.map(element_text).filter(|text| !text.is_empty()));

        let Some(url) = url else {
            tracing::debug!("Skipping result block without URL on {}", doc.request());
            continue;
        };

        let title = block
            .select(&selectors.result_title)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| url.clone());

        let snippet = block
            .select(&selectors.result_snippet)
            .next()
            .map(element_text)
            .unwrap_or_default();

        entries.push(ResultEntry {
            url,
            title,
            snippet,
        });
    }

    entries
}

fn no_results_in(html: &Html, selectors: &PageSelectors) -> bool {
    html.select(&selectors.no_results).next().is_some()
}

fn total_in(html: &Html, selectors: &PageSelectors) -> Option<u64> {
    let marker = html.select(&selectors.total).next()?;
    let digits: String = element_text(marker)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;
    use crate::query::QueryBuilder;

    fn selectors() -> PageSelectors {
        PageSelectors::compile(&SelectorConfig::default()).unwrap()
    }

    fn doc(body: &str) -> Document {
        Document::parse(QueryBuilder::default().build("nginx"), body.as_bytes()).unwrap()
    }

    const PAGE: &str = r#"<html><body>
        <div class="search-info">Found <strong>1,204</strong> hosts</div>
        <div class="search-result">
            <a class="result-url" href="http://abc.onion/">abc.onion</a>
            <h4 class="result-title">Welcome to nginx!</h4>
            <p class="result-snippet">Server:  nginx/1.10.3
            Content-Type: text/html</p>
        </div>
        <div class="search-result">
            <a class="result-url">def.onion:8080</a>
        </div>
        <div class="search-result">
            <h4 class="result-title">No link here</h4>
        </div>
    </body></html>"#;

    #[test]
    fn test_extract_results() {
        let entries = extract_results(&doc(PAGE), &selectors());
        assert_eq!(entries.len(), 2);

        assert_eq!(entries[0].url, "http://abc.onion/");
        assert_eq!(entries[0].title, "Welcome to nginx!");
        assert_eq!(
            entries[0].snippet,
            "Server: nginx/1.10.3 Content-Type: text/html"
        );

        // Falls back to link text and uses the URL as title
        assert_eq!(entries[1].url, "def.onion:8080");
        assert_eq!(entries[1].title, "def.onion:8080");
        assert_eq!(entries[1].snippet, "");
    }

    #[test]
    fn test_extract_total() {
        assert_eq!(extract_total(&doc(PAGE), &selectors()), Some(1204));
        assert_eq!(
            extract_total(&doc("<html><body></body></html>"), &selectors()),
            None
        );
    }

    #[test]
    fn test_no_results_marker() {
        let empty = doc(r#"<html><body><div class="no-results">Nothing found</div>
            <div class="search-result"><a class="result-url" href="x">x</a></div>
            </body></html>"#);
        assert!(has_no_results(&empty, &selectors()));
        assert!(extract_results(&empty, &selectors()).is_empty());
        assert!(!has_no_results(&doc(PAGE), &selectors()));
    }

    #[test]
    fn test_inspect_first_page() {
        let first = inspect_first_page(&doc(PAGE), &selectors());
        assert_eq!(
            first,
            FirstPage {
                no_results: false,
                total: Some(1204)
            }
        );
    }

    #[test]
    fn test_display_block() {
        let entry = ResultEntry {
            url: "http://abc.onion/".to_string(),
            title: "abc".to_string(),
            snippet: "nginx".to_string(),
        };
        assert_eq!(
            entry.to_string(),
            "URL: http://abc.onion/\nTitle: abc\nSnippet: nginx"
        );
    }
}
