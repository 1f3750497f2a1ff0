//! Mirror resolution for the sdarot site
//!
//! The site moves between top-level domains. This module probes a fixed list
//! of mirrors with HEAD requests and remembers the first one that answers.

use std::time::Duration;

use log::{debug, info, warn};

use crate::error::Result;

/// Common prefix of every mirror
const SDAROT_BASE_URL: &str = "https://sdarot.";

/// Top-level domains the site has been seen under, in probing order
const MIRROR_SUFFIXES: [&str; 6] = ["tv", "dev", "world", "work", "casa", "pro"];

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept-Language header for Hebrew content
const DEFAULT_ACCEPT_LANGUAGE: &str = "he-IL,he;q=0.9,en;q=0.8";

/// Configuration for the site connector
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Mirror base URLs, probed in order (default: `https://sdarot.{tv,dev,...}`)
    pub candidates: Vec<String>,
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            candidates: MIRROR_SUFFIXES
                .iter()
                .map(|suffix| format!("{}{}", SDAROT_BASE_URL, suffix))
                .collect(),
            timeout_secs: 10,
        }
    }
}

/// Resolves and remembers a reachable sdarot mirror
///
/// Redirects are not followed: a parked domain answering 301 is not
/// considered reachable.
pub struct SiteConnector {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Mirrors to probe
    candidates: Vec<String>,
    /// Mirror fixed by a successful `connect()`
    resolved: Option<String>,
}

impl SiteConnector {
    /// Create a connector with the default mirror list
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ConnectorConfig::default())
    }

    /// Create a connector with custom configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ConnectorConfig) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
        );

        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            candidates: config.candidates,
            resolved: None,
        })
    }

    /// Find a reachable mirror, or re-check the one already found.
    ///
    /// # Returns
    /// * `Ok(true)` if a mirror answered HTTP 200
    /// * `Ok(false)` if none did; the caller should give up
    pub async fn connect(&mut self) -> Result<bool> {
        if let Some(url) = &self.resolved {
            let alive = self.probe(url).await;
            if !alive {
                warn!("Mirror {} stopped answering", url);
            }
            return Ok(alive);
        }

        for candidate in &self.candidates {
            if self.probe(candidate).await {
                info!("Using mirror {}", candidate);
                self.resolved = Some(candidate.clone());
                return Ok(true);
            }
        }

        warn!("None of {} mirrors answered", self.candidates.len());
        Ok(false)
    }

    /// Base URL of the resolved mirror, if `connect()` succeeded
    pub fn base_url(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    /// Mirrors this connector probes, in order
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// HEAD a single URL; transport errors count as unreachable
    async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => {
                debug!("HEAD {} -> {}", url, response.status());
                response.status() == reqwest::StatusCode::OK
            }
            Err(e) => {
                debug!("HEAD {} failed: {}", url, e);
                false
            }
        }
    }
}
