//! Error types for the sdarot player
//!
//! This module defines all error types used throughout the library.
//! Two variants are signals rather than failures: `SeriesEnded` is raised
//! when the last episode of the last season finished, `PlayerExited` when
//! the browser session went away under the driver.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for sdarot player operations
#[derive(Error, Debug)]
pub enum SdarotError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// None of the mirror domains answered
    #[error("Site unreachable: {0}")]
    SiteUnreachable(String),

    /// An operation needed a resolved mirror before `connect()` succeeded
    #[error("Not connected to any sdarot mirror")]
    NotConnected,

    /// An operation needed a live browser session
    #[error("No browser session - search or open a series first")]
    NoSession,

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Empty or unusable search query
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// Chosen search match does not exist
    #[error("Invalid selection: {0}")]
    InvalidSelection(usize),

    /// Season number outside the seasons listed on the page
    #[error("Season {0} is not available")]
    InvalidSeason(u32),

    /// Episode number outside the episodes listed for the season
    #[error("Episode {episode} of season {season} is not available")]
    InvalidEpisode { season: u32, episode: u32 },

    /// Required page element was not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A wait on the page ran out of time
    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    /// Browser launch or DevTools call failed
    #[error("Browser error: {0}")]
    BrowserError(String),

    /// Page text could not be interpreted
    #[error("Failed to parse: {0}")]
    ParseError(String),

    /// A bounded retry loop gave up
    #[error("Gave up on {step} after {attempts} attempts")]
    RetriesExhausted { step: String, attempts: u32 },

    /// The series page lists no seasons or episodes
    #[error("Nothing to play: {0}")]
    NothingToPlay(String),

    /// Last episode of the last season finished
    #[error("Last episode of series ended - nothing else to play here")]
    SeriesEnded,

    /// The browser session was lost during playback
    #[error("Chrome player has unexpectedly exited: {0}")]
    PlayerExited(String),
}

impl SdarotError {
    /// True for waits that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SdarotError::Timeout(_))
    }

    /// True for faults that mean the browser session is no longer usable.
    pub fn is_session_fault(&self) -> bool {
        matches!(
            self,
            SdarotError::BrowserError(_) | SdarotError::ElementNotFound(_) | SdarotError::Timeout(_)
        )
    }
}

/// Serialize SdarotError as its display string for JSON output
impl Serialize for SdarotError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for sdarot player operations
pub type Result<T> = std::result::Result<T, SdarotError>;
