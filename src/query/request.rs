use std::fmt;
use std::sync::Arc;

/// Canonical request for one page of the search endpoint
///
/// Wraps the target path (including query string). Its canonical form is the
/// line `GET <path>\n`; equality and hashing are defined on that form, which is
/// what the frontier deduplicates on. The fetcher sends the path as a regular
/// HTTP request, percent-encoded by the client.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchRequest {
    path: Arc<str>,
}

impl SearchRequest {
    /// Creates a request for a literal site path
    pub(crate) fn from_path(path: &str) -> Self {
        Self {
            path: Arc::from(path),
        }
    }

    /// Returns the target path, e.g. `/search?query=nginx`
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Canonical `GET <path>` line used to identify and deduplicate the request
    pub fn request_line(&self) -> String {
        format!("GET {}\n", self.path)
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GET {}", self.path)
    }
}
