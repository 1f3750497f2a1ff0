//! Data types for the sdarot player
//!
//! This module contains the small value types the driver hands out or keeps
//! between calls. None of them outlive a run.

use serde::{Deserialize, Serialize};

/// Search suggestion returned by the site's live search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesMatch {
    /// Position in the suggestion list (0-based)
    pub index: usize,
    /// Visible text of the suggestion
    pub title: String,
}

/// Whether a browser session shows a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// No window, used for searching
    Headless,
    /// Visible window, used for playback
    Visible,
}

/// Traversal position inside the series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationCursor {
    /// Season currently being played (1-based label)
    pub season: Option<u32>,
    /// Episode currently being played (1-based label)
    pub episode: Option<u32>,
    /// Set once the numerically last season is reached
    pub last_season: bool,
}

impl NavigationCursor {
    /// True when nothing has been played since the last reset
    pub fn is_empty(&self) -> bool {
        self.season.is_none() && self.episode.is_none() && !self.last_season
    }
}

/// Playback driver state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Idle,
    SeasonSelected { season: u32 },
    EpisodeSelected { season: u32, episode: u32 },
    Playing { season: u32, episode: u32 },
    NextEpisode { season: u32, episode: u32 },
    SeasonComplete { season: u32 },
    SeriesComplete,
    Error,
}
