//! Text parsers for sdarot pages
//!
//! This module contains the small parsers the driver needs:
//! - `time`: Parse the video player's remaining-time display
//! - `url`: Accept direct series URLs and season/episode labels

pub mod time;
pub mod url;

// Re-export main parsing functions
pub use time::{parse_remaining, to_sec};
pub use url::{check_valid_url, parse_label};
