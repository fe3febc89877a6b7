//! Frontier / dedup tracker
//!
//! The set of page requests already dispatched in one crawl session. This is
//! the only place page-level deduplication happens; it only ever grows.

use crate::query::SearchRequest;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared record of dispatched page requests
///
/// Cloning yields another handle to the same set.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    dispatched: Arc<Mutex<HashSet<SearchRequest>>>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically admits `link` if it has not been dispatched yet
    ///
    /// Returns `true` exactly once per distinct request, no matter how many
    /// callers race on it; the caller that gets `true` must schedule the fetch.
    pub fn try_admit(&self, link: &SearchRequest) -> bool {
        let admitted = self.lock().insert(link.clone());
        if !admitted {
            tracing::trace!("{} already visited", link);
        }
        admitted
    }

    pub fn contains(&self, link: &SearchRequest) -> bool {
        self.lock().contains(link)
    }

    /// Number of requests dispatched so far
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // The set is never left half-updated, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, HashSet<SearchRequest>> {
        self.dispatched
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
