use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sdarot_core::{ChromeConfig, ConnectorConfig, PlayerConfig, RetryPolicy};

#[derive(Debug, Parser)]
#[command(
    name = "sdarot-player",
    version,
    about = "Search sdarot for a series and play it to the end, unattended"
)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive menu (default)
    Menu,
    /// Print the reachable mirror
    Check,
    /// List series matching a name
    Search {
        name: String,
        /// Print matches as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a series page from an optional season/episode
    Play {
        url: String,
        #[arg(long, short)]
        season: Option<u32>,
        #[arg(long, short, requires = "season")]
        episode: Option<u32>,
    },
}

#[derive(Debug, Args)]
pub struct Settings {
    /// Chrome/Chromium binary to drive
    #[arg(long, global = true, env = "SDAROT_CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Mirror base URL to probe instead of the built-in list (repeatable)
    #[arg(long = "mirror", global = true)]
    pub mirrors: Vec<String>,

    /// Do not switch videos to fullscreen
    #[arg(long, global = true)]
    pub no_fullscreen: bool,

    /// Do not maximize the playback window
    #[arg(long, global = true)]
    pub no_maximize: bool,

    /// Attempts at loading a season or episode before giving up
    #[arg(long, global = true, default_value_t = 3)]
    pub max_attempts: u32,

    /// Seconds left at which a video counts as finished
    #[arg(long, global = true, default_value_t = 30)]
    pub end_threshold: u64,

    /// Debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Settings {
    pub fn connector_config(&self) -> ConnectorConfig {
        let mut config = ConnectorConfig::default();
        if !self.mirrors.is_empty() {
            config.candidates = self
                .mirrors
                .iter()
                .map(|m| m.trim_end_matches('/').to_string())
                .collect();
        }
        config
    }

    pub fn chrome_config(&self) -> ChromeConfig {
        ChromeConfig {
            chrome_path: self.chrome_path.clone(),
            maximize: !self.no_maximize,
            ..ChromeConfig::default()
        }
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            fullscreen: !self.no_fullscreen,
            end_threshold_secs: self.end_threshold,
            retry: RetryPolicy::new(self.max_attempts),
            ..PlayerConfig::default()
        }
    }
}
