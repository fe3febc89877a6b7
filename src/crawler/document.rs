//! Fetched pages and the selectors used to read them
//!
//! A [`Document`] is immutable once built and cheap to clone, so the same page
//! can be handed to the pagination and result extractors at the same time.
//! Each extractor parses its own DOM from the shared source with `scraper`.

use crate::config::SelectorConfig;
use crate::query::SearchRequest;
use crate::{ConfigError, SiftError};
use scraper::{ElementRef, Html, Selector};
use std::sync::Arc;

/// One fetched result page
#[derive(Debug, Clone)]
pub struct Document {
    request: SearchRequest,
    source: Arc<str>,
}

impl Document {
    /// Builds a document from raw response bytes
    ///
    /// # Errors
    ///
    /// Returns `SiftError::Parse` if the body is not UTF-8, is empty, or
    /// contains no markup at all.
    pub fn parse(request: SearchRequest, bytes: &[u8]) -> Result<Self, SiftError> {
        let source = std::str::from_utf8(bytes).map_err(|e| SiftError::Parse {
            request: request.to_string(),
            message: format!("response is not valid UTF-8: {}", e),
        })?;

        if source.trim().is_empty() {
            return Err(SiftError::Parse {
                request: request.to_string(),
                message: "empty response body".to_string(),
            });
        }

        if !source.contains('<') {
            return Err(SiftError::Parse {
                request: request.to_string(),
                message: "response contains no markup".to_string(),
            });
        }

        Ok(Self {
            request,
            source: Arc::from(source),
        })
    }

    /// The request this page was fetched for
    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    /// Raw page source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parses the page into a queryable DOM
    pub(crate) fn html(&self) -> Html {
        Html::parse_document(&self.source)
    }
}

/// Compiled form of [`SelectorConfig`]
#[derive(Debug, Clone)]
pub struct PageSelectors {
    pub(crate) pagination: Selector,
    pub(crate) current_page: Selector,
    pub(crate) page_link: Selector,
    pub(crate) disabled: Selector,
    pub(crate) no_results: Selector,
    pub(crate) total: Selector,
    pub(crate) result: Selector,
    pub(crate) result_url: Selector,
    pub(crate) result_title: Selector,
    pub(crate) result_snippet: Selector,
    pub(crate) previous_label: String,
    pub(crate) next_label: String,
}

impl PageSelectors {
    /// Compiles every selector in the configuration
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        use crate::config::validation::compile_selector;

        Ok(Self {
            pagination: compile_selector(&config.pagination)?,
            current_page: compile_selector(&config.current_page)?,
            page_link: compile_selector(&config.page_link)?,
            disabled: compile_selector(&config.disabled)?,
            no_results: compile_selector(&config.no_results)?,
            total: compile_selector(&config.total)?,
            result: compile_selector(&config.result)?,
            result_url: compile_selector(&config.result_url)?,
            result_title: compile_selector(&config.result_title)?,
            result_snippet: compile_selector(&config.result_snippet)?,
            previous_label: config.previous_label.trim().to_string(),
            next_label: config.next_label.trim().to_string(),
        })
    }

    /// True if `text` is one of the previous/next navigation labels
    pub(crate) fn is_navigation_label(&self, text: &str) -> bool {
        text.eq_ignore_ascii_case(&self.previous_label) || text.eq_ignore_ascii_case(&self.next_label)
    }
}

/// Visible text of an element with whitespace runs collapsed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryBuilder;

    fn request() -> SearchRequest {
        QueryBuilder::default().build("nginx")
    }

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(request(), b"<html><body>ok</body></html>").unwrap();
        assert_eq!(doc.request().path(), "/search?query=nginx");
        assert!(doc.source().contains("ok"));
    }

    #[test]
    fn test_parse_rejects_invalid_utf8() {
        let result = Document::parse(request(), &[0xff, 0xfe, 0x3c]);
        assert!(matches!(result, Err(SiftError::Parse { .. })));
    }

    #[test]
    fn test_parse_rejects_empty_body() {
        assert!(matches!(
            Document::parse(request(), b"  \n"),
            Err(SiftError::Parse { .. })
        ));
        assert!(matches!(
            Document::parse(request(), b"plain text"),
            Err(SiftError::Parse { .. })
        ));
    }

    #[test]
    fn test_element_text_collapses_whitespace() {
        let html = Html::parse_fragment("<p>  Apache \n  httpd   2.4 </p>");
        let selector = Selector::parse("p").unwrap();
        let p = html.select(&selector).next().unwrap();
        assert_eq!(element_text(p), "Apache httpd 2.4");
    }

    #[test]
    fn test_navigation_labels() {
        let selectors = PageSelectors::compile(&SelectorConfig::default()).unwrap();
        assert!(selectors.is_navigation_label("Next"));
        assert!(selectors.is_navigation_label("previous"));
        assert!(!selectors.is_navigation_label("2"));
    }
}
