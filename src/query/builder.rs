use crate::config::QueryConfig;
use crate::query::SearchRequest;
use url::Url;

/// Turns user input and pagination hrefs into canonical [`SearchRequest`]s
///
/// # Rules
///
/// | Input | Result |
/// |-------|--------|
/// | `/page/5` | literal path `/page/5` |
/// | `http://host/page/5` | literal path `/page/5` (scheme and host dropped) |
/// | `nginx&page=3` | search for `nginx` (fragment after the delimiter dropped) |
/// | `nginx` | search for `nginx` |
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    search_path: String,
    fragment_delimiter: String,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}

impl QueryBuilder {
    /// Creates a builder from the query configuration
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            search_path: config.search_path.clone(),
            fragment_delimiter: config.fragment_delimiter.clone(),
        }
    }

    /// Builds the canonical request for an input string
    ///
    /// Never fails; any string maps to some request.
    ///
    /// # Example
    ///
    /// ```
    /// use deepsift::QueryBuilder;
    ///
    /// let builder = QueryBuilder::default();
    /// assert_eq!(
    ///     builder.build("darknet market").request_line(),
    ///     "GET /search?query=darknet market\n"
    /// );
    /// assert_eq!(builder.build("/page/5").request_line(), "GET /page/5\n");
    /// ```
    pub fn build(&self, input: &str) -> SearchRequest {
        let input = input.trim();

        if input.starts_with('/') {
            return SearchRequest::from_path(input);
        }

        if let Some(path) = absolute_path(input) {
            return SearchRequest::from_path(&path);
        }

        let term = if !input.starts_with(self.fragment_delimiter.as_str()) {
            input
                .split_once(self.fragment_delimiter.as_str())
                .map(|(term, _fragment)| term)
                .unwrap_or(input)
        } else {
            input
        };

        SearchRequest::from_path(&format!("{}{}", self.search_path, term))
    }
}

/// Extracts path and query from an absolute http(s) link
fn absolute_path(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    Some(match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    })
}
