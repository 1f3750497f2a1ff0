//! Playback driver configuration
//!
//! Waits on the site are fixed short timeouts. They live here so tests can
//! shrink them to zero.

use std::time::Duration;

/// Bounded retry for season/episode advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts before giving up, including the first one (default: 3)
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

impl RetryPolicy {
    /// Policy that tries at most `max_attempts` times (at least once)
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

/// Configuration for the playback driver
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Wait for the live-search suggestions (default: 3s)
    pub search_timeout: Duration,
    /// Wait for the season list after opening a series page (default: 20s)
    pub series_page_timeout: Duration,
    /// Wait for the episode list while playing (default: 10s)
    pub episode_list_timeout: Duration,
    /// Wait for the episode list while validating input (default: 20s)
    pub episode_check_timeout: Duration,
    /// Wait for the proceed control to become clickable (default: 35s)
    pub proceed_timeout: Duration,
    /// Wait for the big play button (default: 10s)
    pub play_button_timeout: Duration,
    /// Pause after entering fullscreen (default: 2s)
    pub fullscreen_settle: Duration,
    /// Interval between remaining-time checks (default: 1s)
    pub poll_interval: Duration,
    /// A video with at most this many seconds left counts as finished (default: 30)
    pub end_threshold_secs: u64,
    /// Vertical scroll offset of the video on an episode page (default: 1436)
    pub scroll_offset: i64,
    /// Toggle fullscreen around each video (default: true)
    pub fullscreen: bool,
    /// Retry policy for season and episode advances
    pub retry: RetryPolicy,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            search_timeout: Duration::from_secs(3),
            series_page_timeout: Duration::from_secs(20),
            episode_list_timeout: Duration::from_secs(10),
            episode_check_timeout: Duration::from_secs(20),
            proceed_timeout: Duration::from_secs(35),
            play_button_timeout: Duration::from_secs(10),
            fullscreen_settle: Duration::from_secs(2),
            poll_interval: Duration::from_secs(1),
            end_threshold_secs: 30,
            scroll_offset: 1436,
            fullscreen: true,
            retry: RetryPolicy::default(),
        }
    }
}

impl PlayerConfig {
    /// Configuration with every wait and pause set to zero
    pub fn immediate() -> Self {
        Self {
            search_timeout: Duration::ZERO,
            series_page_timeout: Duration::ZERO,
            episode_list_timeout: Duration::ZERO,
            episode_check_timeout: Duration::ZERO,
            proceed_timeout: Duration::ZERO,
            play_button_timeout: Duration::ZERO,
            fullscreen_settle: Duration::ZERO,
            poll_interval: Duration::ZERO,
            ..Self::default()
        }
    }
}
