/// Crawl state definitions for the level-synchronized traversal
///
/// A crawl moves through each depth in two phases: `Leveling` while the
/// level's fetches are being launched, `Draining` while they are awaited.
use std::fmt;

/// Represents where the orchestrator is in a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlState {
    /// Created but not started
    Idle,

    /// Launching fetches for the given depth
    Leveling(u32),

    /// Waiting for every fetch of the given depth to finish
    Draining(u32),

    /// Crawl finished; all pending writes have completed
    Done,
}

impl CrawlState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns the depth being processed, if any
    pub fn depth(&self) -> Option<u32> {
        match self {
            Self::Leveling(depth) | Self::Draining(depth) => Some(*depth),
            Self::Idle | Self::Done => None,
        }
    }

    /// Validates if a state transition is allowed
    ///
    /// # Valid Transitions
    ///
    /// - Idle → Leveling(0)
    /// - Leveling(d) → Draining(d)
    /// - Draining(d) → Leveling(d + 1)
    /// - Draining(d) → Done
    pub fn can_transition_to(&self, target: CrawlState) -> bool {
        match (*self, target) {
            (Self::Idle, Self::Leveling(0)) => true,
            (Self::Leveling(from), Self::Draining(to)) => from == to,
            (Self::Draining(from), Self::Leveling(to)) => from.checked_add(1) == Some(to),
            (Self::Draining(_), Self::Done) => true,
            _ => false,
        }
    }
}

impl fmt::Display for CrawlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Leveling(depth) => write!(f, "leveling({})", depth),
            Self::Draining(depth) => write!(f, "draining({})", depth),
            Self::Done => write!(f, "done"),
        }
    }
}
