//! Sdarot Player Core Library
//!
//! This crate finds a reachable sdarot mirror and drives a Chrome session
//! through a series, season by season and episode by episode, waiting for
//! each video to end before moving on.
//!
//! # Features
//! - Mirror resolution with HEAD probes
//! - Series search through the site's live search
//! - Season/episode validation against the live page
//! - Unattended playback to the end of the series, with bounded retries

pub mod chrome;
pub mod config;
pub mod connector;
pub mod error;
pub mod page;
pub mod parser;
pub mod player;
pub mod types;

// Re-export main types for convenience
pub use chrome::{ChromeConfig, ChromeLauncher, ChromePage};
pub use config::{PlayerConfig, RetryPolicy};
pub use connector::{ConnectorConfig, SiteConnector};
pub use error::{Result, SdarotError};
pub use page::{Launcher, Page, Session};
pub use player::Player;
pub use types::{NavigationCursor, PlaybackState, SeriesMatch, SessionMode};
