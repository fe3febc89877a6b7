use crate::crawler::ResultEntry;
use crate::query::SearchRequest;
use chrono::{DateTime, Utc};
use std::fmt;

/// Identifies one page fetch and the extraction work derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(pub u64);

impl BranchId {
    /// Branch of the seed request
    pub const SEED: BranchId = BranchId(0);
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A page whose fetch failed and whose subtree was given up
#[derive(Debug, Clone)]
pub struct AbandonedBranch {
    pub branch: BranchId,
    pub request: SearchRequest,
    pub reason: String,
}

/// Outcome of a finished crawl session
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Input the session was started with
    pub query: String,

    /// Canonical seed request
    pub request: SearchRequest,

    /// Result count reported by the first page, if it could be read
    pub expected_total: Option<u64>,

    /// Collected result entries; no global order
    pub entries: Vec<ResultEntry>,

    /// Pages successfully fetched
    pub pages_fetched: usize,

    /// Pages admitted to the frontier
    pub pages_admitted: usize,

    /// Failed branches skipped under the isolate-branch policy
    pub abandoned: Vec<AbandonedBranch>,

    /// The expected total was reached (or no total was reported and the
    /// frontier was fully explored)
    pub complete: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    /// Wall-clock duration of the session
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
