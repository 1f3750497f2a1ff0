//! Remaining-time parsing for the video.js control bar
//!
//! The player shows the remaining time as `-m:ss` or `-h:mm:ss`, sometimes
//! prefixed with a hidden "Remaining Time" label.

use crate::error::{Result, SdarotError};

/// Convert time components to seconds.
///
/// Components are most-significant first: `[minutes, seconds]` or
/// `[hours, minutes, seconds]`.
///
/// # Examples
/// ```
/// use sdarot_core::parser::to_sec;
///
/// assert_eq!(to_sec(&["1", "02"]).unwrap(), 62);
/// assert_eq!(to_sec(&["1", "1", "05"]).unwrap(), 3665);
/// assert!(to_sec(&["x", "05"]).is_err());
/// assert!(to_sec(&["999999999999999999", "00"]).is_err());
/// ```
pub fn to_sec(parts: &[&str]) -> Result<u64> {
    parts.iter().try_fold(0u64, |acc, part| {
        let value: u64 = part
            .trim()
            .parse()
            .map_err(|_| SdarotError::ParseError(format!("time component '{}'", part)))?;
        acc.checked_mul(60)
            .and_then(|acc| acc.checked_add(value))
            .ok_or_else(|| SdarotError::ParseError(format!("time out of range at '{}'", part)))
    })
}

/// Parse the remaining-time display text into seconds.
///
/// Returns `None` when the text holds no `[h:]m:ss` group.
pub fn parse_remaining(text: &str) -> Option<u64> {
    let re = regex_lite::Regex::new(r"(\d+(?::\d{1,2}){1,2})\s*$").ok()?;
    let caps = re.captures(text.trim())?;
    let parts: Vec<&str> = caps.get(1)?.as_str().split(':').collect();
    to_sec(&parts).ok()
}
