//! Crawl phase definitions for tracking engine progress
//!
//! A run moves through `Seeding`, then one `Expanding` phase per depth level,
//! then `Done`. Depths are never skipped or revisited.

use crate::ReelError;
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Building the initial frontier and pre-populating the visited map
    Seeding,

    /// Running the stage for the given depth (1-based)
    Expanding { depth: u32 },

    /// The visited map is final
    Done,
}

impl CrawlPhase {
    /// Returns true if no further work will happen in this run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    ///
    /// Legal transitions are `Seeding -> Expanding(1)`,
    /// `Expanding(d) -> Expanding(d + 1)` and `Expanding(_) -> Done`.
    /// `Seeding -> Done` covers a run configured with no depth levels.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Seeding, Self::Expanding { depth }) => depth == 1,
            (Self::Expanding { depth: current }, Self::Expanding { depth }) => {
                depth == current + 1
            }
            (Self::Seeding | Self::Expanding { .. }, Self::Done) => true,
            _ => false,
        }
    }

    /// Performs a checked transition
    pub fn transition(self, next: CrawlPhase) -> Result<CrawlPhase, ReelError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ReelError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeding => write!(f, "seeding"),
            Self::Expanding { depth } => write!(f, "expanding(depth={})", depth),
            Self::Done => write!(f, "done"),
        }
    }
}
