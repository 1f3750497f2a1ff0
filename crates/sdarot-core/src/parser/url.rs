//! URL and label checks for sdarot pages

use crate::error::{Result, SdarotError};

/// Pattern a direct series URL must match.
const WATCH_URL_PATTERN: &str = r"^https://sdarot\..*/watch/.*$";

/// Check whether a URL points at a series page on any sdarot mirror.
///
/// # Examples
/// ```
/// use sdarot_core::parser::check_valid_url;
///
/// assert!(check_valid_url("https://sdarot.tv/watch/12345"));
/// assert!(!check_valid_url("https://example.com/watch/1"));
/// ```
pub fn check_valid_url(url: &str) -> bool {
    regex_lite::Regex::new(WATCH_URL_PATTERN)
        .map(|re| re.is_match(url.trim()))
        .unwrap_or(false)
}

/// Parse a season or episode label ("3", " 12 ") into its number.
pub fn parse_label(text: &str) -> Result<u32> {
    text.trim()
        .parse()
        .map_err(|_| SdarotError::ParseError(format!("season/episode label '{}'", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_watch_url() {
        assert!(check_valid_url("https://sdarot.tv/watch/12345"));
        assert!(check_valid_url("https://sdarot.world/watch/123-fauda"));
        assert!(check_valid_url("  https://sdarot.tv/watch/1  "));
    }

    #[test]
    fn test_invalid_watch_url() {
        assert!(!check_valid_url("https://example.com/watch/1"));
        assert!(!check_valid_url("http://sdarot.tv/watch/1"));
        assert!(!check_valid_url("https://sdarot.tv/series/1"));
        assert!(!check_valid_url("https://sdarotxtv/watch/1"));
        assert!(!check_valid_url(""));
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("3").unwrap(), 3);
        assert_eq!(parse_label(" 12\n").unwrap(), 12);
        assert!(parse_label("Special").is_err());
        assert!(parse_label("").is_err());
    }

    proptest! {
        #[test]
        fn prop_any_mirror_and_id_accepted(tld in "[a-z]{2,6}", id in 1u32..1_000_000) {
            let url = format!("https://sdarot.{}/watch/{}", tld, id);
            prop_assert!(check_valid_url(&url));
        }

        #[test]
        fn prop_other_hosts_rejected(host in "[a-r][a-z]{2,8}", id in 1u32..1000) {
            let url = format!("https://{}.com/watch/{}", host, id);
            prop_assert!(!check_valid_url(&url));
        }
    }
}
