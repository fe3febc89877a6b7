//! State module for tracking crawl session progress
//!
//! # Components
//!
//! - `CrawlState`: lifecycle of one crawl session (seeding, running, draining, done, failed)
//! - `SessionState`: the state plus guarded transitions

mod crawl_state;

pub use crawl_state::CrawlState;

use crate::{Result, SiftError};

/// Holds the current [`CrawlState`] and enforces legal transitions
#[derive(Debug)]
pub struct SessionState {
    current: CrawlState,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Creates a session in the `Seeding` state
    pub fn new() -> Self {
        Self {
            current: CrawlState::Seeding,
        }
    }

    pub fn current(&self) -> CrawlState {
        self.current
    }

    /// Moves to `next`, or returns `InvalidTransition`
    pub fn transition(&mut self, next: CrawlState) -> Result<()> {
        if !self.current.can_transition_to(next) {
            return Err(SiftError::InvalidTransition {
                from: self.current,
                to: next,
            });
        }

        tracing::debug!("Crawl state: {} -> {}", self.current, next);
        self.current = next;
        Ok(())
    }
}
