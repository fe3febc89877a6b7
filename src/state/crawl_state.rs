/// Crawl session state definitions
///
/// A session moves `Seeding -> Running -> Draining -> Done`; `Failed` can be
/// reached from any state that is not terminal.
use std::fmt;

/// Represents the current state of one crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    // ===== Active States =====
    /// Seed request is being built and dispatched
    Seeding,

    /// Events are being processed and new pages admitted
    Running,

    /// Expected total reached; no further pages are admitted
    Draining,

    // ===== Terminal States =====
    /// Final result collection is available
    Done,

    /// Session aborted with an error
    Failed,
}

impl CrawlState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Returns true while discovered pages may still be admitted to the frontier
    pub fn is_admitting(&self) -> bool {
        matches!(self, Self::Seeding | Self::Running)
    }

    /// Checks whether a transition from this state to `next` is allowed
    pub fn can_transition_to(&self, next: CrawlState) -> bool {
        use CrawlState::*;

        match (self, next) {
            (Seeding, Running) => true,
            (Running, Draining) => true,
            // The frontier can run dry before the expected total is reached
            (Running, Done) => true,
            (Draining, Done) => true,
            (from, Failed) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Returns a short lowercase name used in logs and summaries
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seeding => "seeding",
            Self::Running => "running",
            Self::Draining => "draining",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
