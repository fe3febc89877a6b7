//! Pagination extractor
//!
//! Reads the pagination control of a result page and returns the links to
//! pages *after* the current one. Backward links, the current page and the
//! previous/next arrows are dropped here; whether a forward page was already
//! fetched is decided by the frontier.

use crate::crawler::document::{element_text, Document, PageSelectors};
use crate::query::{QueryBuilder, SearchRequest};

/// Forward pagination links found on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// Index of the page the document shows (0 when there is no pagination)
    pub current_page: u32,

    /// Canonical requests for later pages, in document order
    pub links: Vec<SearchRequest>,

    /// The "next" control is disabled, i.e. this is the final page
    pub last_page: bool,
}

/// Extracts the current page index and forward page links
///
/// # Rules
///
/// 1. No pagination region → `current_page = 0`, no links
/// 2. Links labelled previous/next are skipped
/// 3. Links whose label is not a page number, or is `<= current_page`, are skipped
/// 4. Remaining hrefs are canonicalized with the [`QueryBuilder`]
pub fn extract_links(doc: &Document, selectors: &PageSelectors, builder: &QueryBuilder) -> PageLinks {
    let html = doc.html();

    let Some(pagination) = html.select(&selectors.pagination).next() else {
        tracing::debug!("No more pages after {}", doc.request());
        return PageLinks::default();
    };

    let current_page = pagination
        .select(&selectors.current_page)
        .next()
        .and_then(|marker| parse_page_number(&element_text(marker)))
        .unwrap_or(0);

    let last_page = pagination
        .select(&selectors.disabled)
        .any(|marker| element_text(marker).eq_ignore_ascii_case(&selectors.next_label));

    let mut links = Vec::new();
    for anchor in pagination.select(&selectors.page_link) {
        let label = element_text(anchor);

        if selectors.is_navigation_label(&label) {
            continue;
        }

        let Some(number) = parse_page_number(&label) else {
            tracing::trace!("Skipping pagination link with label '{}'", label);
            continue;
        };

        if number <= current_page {
            continue;
        }

        if let Some(href) = anchor.value().attr("href") {
            links.push(builder.build(href));
        }
    }

    tracing::debug!(
        "Page {} of {} lists {} forward links",
        current_page,
        doc.request(),
        links.len()
    );

    PageLinks {
        current_page,
        links,
        last_page,
    }
}

/// Parses a page label such as `"3"` or `" 12 "`
fn parse_page_number(label: &str) -> Option<u32> {
    label.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;

    fn selectors() -> PageSelectors {
        PageSelectors::compile(&SelectorConfig::default()).unwrap()
    }

    fn doc(body: &str) -> Document {
        let builder = QueryBuilder::default();
        Document::parse(builder.build("nginx"), body.as_bytes()).unwrap()
    }

    fn pagination(current: u32, pages: &[u32], last: bool) -> String {
        let mut html = String::from(r#"<html><body><ul class="pagination">"#);
        html.push_str(r#"<li><a href="/search?query=nginx&page=prev">Previous</a></li>"#);
        for page in pages {
            if *page == current {
                html.push_str(&format!(r#"<li class="active"><span>{}</span></li>"#, page));
            } else {
                html.push_str(&format!(
                    r#"<li><a href="/search?query=nginx&page={0}">{0}</a></li>"#,
                    page
                ));
            }
        }
        if last {
            html.push_str(r#"<li class="disabled"><span>Next</span></li>"#);
        } else {
            html.push_str(r#"<li><a href="/search?query=nginx&page=next">Next</a></li>"#);
        }
        html.push_str("</ul></body></html>");
        html
    }

    #[test]
    fn test_no_pagination_region() {
        let links = extract_links(
            &doc("<html><body><p>one page</p></body></html>"),
            &selectors(),
            &QueryBuilder::default(),
        );
        assert_eq!(links, PageLinks::default());
    }

    #[test]
    fn test_forward_links_only() {
        let links = extract_links(
            &doc(&pagination(2, &[1, 2, 3, 4], false)),
            &selectors(),
            &QueryBuilder::default(),
        );

        assert_eq!(links.current_page, 2);
        assert!(!links.last_page);
        let paths: Vec<_> = links.links.iter().map(|l| l.path()).collect();
        assert_eq!(
            paths,
            vec!["/search?query=nginx&page=3", "/search?query=nginx&page=4"]
        );
    }

    #[test]
    fn test_never_returns_current_or_earlier_pages() {
        for current in 1..=5 {
            let links = extract_links(
                &doc(&pagination(current, &[1, 2, 3, 4, 5], current == 5)),
                &selectors(),
                &QueryBuilder::default(),
            );
            for link in &links.links {
                let page: u32 = link.path().rsplit('=').next().unwrap().parse().unwrap();
                assert!(page > current);
            }
            assert_eq!(links.links.len() as u32, 5 - current);
        }
    }

    #[test]
    fn test_last_page_marker() {
        let links = extract_links(
            &doc(&pagination(3, &[1, 2, 3], true)),
            &selectors(),
            &QueryBuilder::default(),
        );
        assert!(links.last_page);
        assert!(links.links.is_empty());
    }

    #[test]
    fn test_non_numeric_labels_are_skipped() {
        let html = r#"<html><body><ul class="pagination">
            <li class="active"><span>1</span></li>
            <li><a href="/search?query=nginx&page=2">two</a></li>
            <li><a href="/search?query=nginx&page=3">3</a></li>
        </ul></body></html>"#;
        let links = extract_links(&doc(html), &selectors(), &QueryBuilder::default());
        assert_eq!(links.links.len(), 1);
        assert_eq!(links.links[0].path(), "/search?query=nginx&page=3");
    }

    #[test]
    fn test_missing_current_marker_defaults_to_zero() {
        let html = r#"<html><body><ul class="pagination">
            <li><a href="/page/1">1</a></li>
            <li><a href="/page/2">2</a></li>
        </ul></body></html>"#;
        let links = extract_links(&doc(html), &selectors(), &QueryBuilder::default());
        assert_eq!(links.current_page, 0);
        assert_eq!(links.links.len(), 2);
    }

    #[test]
    fn test_absolute_hrefs_are_canonicalized() {
        let html = r#"<html><body><ul class="pagination">
            <li class="active"><span>1</span></li>
            <li><a href="http://example.onion/page/2">2</a></li>
        </ul></body></html>"#;
        let links = extract_links(&doc(html), &selectors(), &QueryBuilder::default());
        assert_eq!(links.links, vec![QueryBuilder::default().build("/page/2")]);
    }
}
