//! Playback driver for sdarot
//!
//! This module provides the high-level API: searching for a series, opening
//! it, validating season/episode choices and playing from a chosen point to
//! the end of the series. All operations are blocking and run on one owned
//! browser session.
//!
//! Playback walks `Idle → SeasonSelected → EpisodeSelected → Playing →
//! NextEpisode | SeasonComplete | SeriesComplete` and ends in `Idle` or
//! `Error`.

use log::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::error::{Result, SdarotError};
use crate::page::{selectors, Launcher, Page, Session};
use crate::parser::{check_valid_url, parse_label, parse_remaining};
use crate::types::{NavigationCursor, PlaybackState, SeriesMatch, SessionMode};

/// Playback driver
///
/// # Example
/// ```no_run
/// use sdarot_core::{ChromeLauncher, Player, PlayerConfig, SdarotError};
///
/// # fn example() -> Result<(), SdarotError> {
/// let mut player = Player::new(ChromeLauncher::default(), PlayerConfig::default());
/// player.set_site("https://sdarot.tv");
/// player.open_url("https://sdarot.tv/watch/1234")?;
/// match player.play(Some(2), None) {
///     Err(SdarotError::SeriesEnded) => println!("Done!"),
///     other => other?,
/// }
/// # Ok(())
/// # }
/// ```
pub struct Player<L: Launcher> {
    launcher: L,
    config: PlayerConfig,
    site: Option<String>,
    session: Option<Session<L::Page>>,
    matches: Vec<SeriesMatch>,
    cursor: NavigationCursor,
    state: PlaybackState,
}

impl<L: Launcher> Player<L> {
    /// Create a driver; no browser is started until it is needed.
    pub fn new(launcher: L, config: PlayerConfig) -> Self {
        Self {
            launcher,
            config,
            site: None,
            session: None,
            matches: Vec::new(),
            cursor: NavigationCursor::default(),
            state: PlaybackState::Idle,
        }
    }

    /// Set the mirror base URL found by the site connector.
    pub fn set_site(&mut self, base_url: &str) {
        self.site = Some(base_url.trim_end_matches('/').to_string());
    }

    /// Mirror base URL, without a trailing slash
    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    /// Timeouts and playback options in use
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Current playback state; `Error` after a failed `play`
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Season and episode reached by the running playback
    pub fn cursor(&self) -> &NavigationCursor {
        &self.cursor
    }

    /// Matches from the last search that have not been acted on yet
    pub fn matches(&self) -> &[SeriesMatch] {
        &self.matches
    }

    /// Whether a browser session is open
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Drop the browser session and forget every traversal detail.
    pub fn reset(&mut self) {
        if self.session.take().is_some() {
            debug!("Browser session closed");
        }
        self.matches.clear();
        self.cursor = NavigationCursor::default();
        self.state = PlaybackState::Idle;
    }

    /// Search the site for series whose name matches `name`.
    ///
    /// Opens a headless session on the home page and types the name into
    /// the live search.
    ///
    /// # Returns
    /// * `Ok(matches)` with the suggestion texts; empty when no suggestion
    ///   list appeared in time
    /// * `Err(SdarotError::InvalidQuery)` if `name` is empty or whitespace-only
    /// * `Err(SdarotError::NotConnected)` if no mirror was set
    pub fn search_series(&mut self, name: &str) -> Result<Vec<SeriesMatch>> {
        let query = name.trim_end();
        if query.trim().is_empty() {
            return Err(SdarotError::InvalidQuery("Search query cannot be empty".to_string()));
        }
        let site = self.site.clone().ok_or(SdarotError::NotConnected)?;

        self.matches.clear();
        self.open_session(SessionMode::Headless, &site)?;
        let page = self.page()?;

        page.type_text(selectors::SEARCH_INPUT, query)?;
        match page.wait_for(selectors::SEARCH_MENU, self.config.search_timeout) {
            Ok(()) => {}
            Err(e) if e.is_timeout() => {
                info!("No suggestions for '{}'", query);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }

        let matches: Vec<SeriesMatch> = page
            .texts(selectors::SEARCH_RESULTS)?
            .into_iter()
            .enumerate()
            .map(|(index, title)| SeriesMatch {
                index,
                title: title.trim().to_string(),
            })
            .collect();

        info!("Found {} matches for '{}'", matches.len(), query);
        self.matches = matches.clone();
        Ok(matches)
    }

    /// Open the search match at `index` (0-based) in the live session.
    pub fn select_match(&mut self, index: usize) -> Result<()> {
        if index >= self.matches.len() {
            return Err(SdarotError::InvalidSelection(index));
        }

        let page = self.page()?;
        page.click(selectors::SEARCH_RESULTS, index)?;
        page.wait_for(selectors::SEASONS, self.config.series_page_timeout)?;

        debug!("Opened '{}'", self.matches[index].title);
        self.matches.clear();
        Ok(())
    }

    /// Open a series page by its URL.
    ///
    /// Reuses the live session, or starts a headless one if there is none.
    pub fn open_url(&mut self, url: &str) -> Result<()> {
        let url = url.trim();
        if !check_valid_url(url) {
            return Err(SdarotError::InvalidUrl(url.to_string()));
        }

        match &self.session {
            Some(session) => session.page().navigate(url)?,
            None => self.open_session(SessionMode::Headless, url)?,
        }
        self.page()?
            .wait_for(selectors::SEASONS, self.config.series_page_timeout)?;
        self.matches.clear();
        Ok(())
    }

    /// Number of seasons listed on the open series page.
    pub fn season_count(&self) -> Result<usize> {
        Ok(self.page()?.texts(selectors::SEASONS)?.len())
    }

    /// Check whether season `se` exists on the open series page.
    pub fn check_valid_season(&self, se: u32) -> Result<bool> {
        let count = self.season_count()?;
        Ok(se >= 1 && se as usize <= count)
    }

    /// Check whether episode `ep` exists in season `se`.
    ///
    /// Selects the season on the page to list its episodes.
    pub fn check_valid_episode(&self, ep: u32, se: u32) -> Result<bool> {
        if !self.check_valid_season(se)? {
            return Ok(false);
        }

        let page = self.page()?;
        page.click(selectors::SEASONS, se as usize - 1)?;
        page.wait_for(selectors::EPISODES, self.config.episode_check_timeout)?;
        let count = page.texts(selectors::EPISODES)?.len();
        Ok(ep >= 1 && ep as usize <= count)
    }

    /// Play from `season`/`episode` (both 1-based, default: the first) to the
    /// end of the series.
    ///
    /// Reopens the current page in a visible browser. Whatever happens, the
    /// session is closed and the driver state cleared on return.
    ///
    /// # Returns
    /// * `Err(SdarotError::SeriesEnded)` once the last episode of the last
    ///   season finished
    /// * `Err(SdarotError::PlayerExited)` if the browser session was lost
    /// * `Err(SdarotError::RetriesExhausted)` if a season or episode never
    ///   loaded
    /// * `Err(SdarotError::NoSession)` if no series page is open
    pub fn play(&mut self, season: Option<u32>, episode: Option<u32>) -> Result<()> {
        let url = self.page()?.current_url();

        let result = url.and_then(|url| self.play_from(&url, season, episode));
        self.reset();

        match result {
            Ok(()) => Ok(()),
            Err(SdarotError::SeriesEnded) => {
                info!("Series complete");
                Err(SdarotError::SeriesEnded)
            }
            Err(e) if e.is_session_fault() => {
                warn!("Player exited: {}", e);
                self.state = PlaybackState::Error;
                Err(SdarotError::PlayerExited(e.to_string()))
            }
            Err(e) => {
                warn!("Playback stopped: {}", e);
                self.state = PlaybackState::Error;
                Err(e)
            }
        }
    }

    /// Whether the current video still has more than the end threshold left.
    ///
    /// Fails open: a missing or unreadable display counts as playing.
    pub fn playing(&self) -> Result<bool> {
        let texts = self.page()?.texts(selectors::REMAINING_TIME)?;
        let Some(text) = texts.first() else {
            return Ok(true);
        };

        match parse_remaining(text) {
            Some(remaining) => Ok(remaining > self.config.end_threshold_secs),
            None => {
                debug!("Unreadable remaining time '{}'", text);
                Ok(true)
            }
        }
    }

    fn page(&self) -> Result<&L::Page> {
        self.session
            .as_ref()
            .map(Session::page)
            .ok_or(SdarotError::NoSession)
    }

    /// Replace the live session with a fresh one on `url`.
    fn open_session(&mut self, mode: SessionMode, url: &str) -> Result<()> {
        // Tear the old browser down before starting the next one
        self.session = None;
        self.state = PlaybackState::Idle;
        self.session = Some(Session::open(&self.launcher, mode, url)?);
        Ok(())
    }

    fn play_from(&mut self, url: &str, season: Option<u32>, episode: Option<u32>) -> Result<()> {
        self.open_session(SessionMode::Visible, url)?;
        self.page()?
            .wait_for(selectors::SEASONS, self.config.series_page_timeout)?;

        let labels = self.page()?.texts(selectors::SEASONS)?;
        let skip = start_offset(season, labels.len())
            .ok_or_else(|| SdarotError::InvalidSeason(season.unwrap_or(1)))?;
        let last_label = labels
            .last()
            .ok_or_else(|| SdarotError::NothingToPlay("no seasons listed".to_string()))?;
        let last = parse_label(last_label)?;

        for (index, label) in labels.iter().enumerate().skip(skip) {
            let number = parse_label(label)?;
            if number == last {
                self.cursor.last_season = true;
            }
            let start = if Some(number) == season { episode } else { None };
            self.play_season(index, number, start)?;
        }

        Ok(())
    }

    fn play_season(&mut self, index: usize, number: u32, episode: Option<u32>) -> Result<()> {
        self.cursor.season = Some(number);
        self.state = PlaybackState::SeasonSelected { season: number };
        info!("Season {}", number);

        let step = format!("episode list of season {}", number);
        self.with_retry(&step, |player| {
            let page = player.page()?;
            page.click(selectors::SEASONS, index)?;
            page.wait_for(selectors::EPISODES, player.config.episode_list_timeout)
        })?;

        let labels = self.page()?.texts(selectors::EPISODES)?;
        let skip = start_offset(episode, labels.len()).ok_or(SdarotError::InvalidEpisode {
            season: number,
            episode: episode.unwrap_or(1),
        })?;
        let last_label = labels
            .last()
            .ok_or_else(|| SdarotError::NothingToPlay(format!("season {} has no episodes", number)))?;
        let last = parse_label(last_label)?;

        for (ep_index, label) in labels.iter().enumerate().skip(skip) {
            let ep = parse_label(label)?;
            self.play_episode(ep_index, number, ep)?;

            if self.cursor.last_season && ep == last {
                self.state = PlaybackState::SeriesComplete;
                return Err(SdarotError::SeriesEnded);
            }
            self.state = PlaybackState::NextEpisode { season: number, episode: ep };
        }

        self.state = PlaybackState::SeasonComplete { season: number };
        Ok(())
    }

    fn play_episode(&mut self, index: usize, season: u32, episode: u32) -> Result<()> {
        self.cursor.episode = Some(episode);
        self.state = PlaybackState::EpisodeSelected { season, episode };
        info!("Playing S{:02}E{:02}", season, episode);

        let step = format!("episode {} of season {}", episode, season);
        self.with_retry(&step, |player| {
            let page = player.page()?;
            page.click(selectors::EPISODES, index)?;
            page.scroll_to(0, player.config.scroll_offset)?;
            page.wait_clickable(selectors::PROCEED, player.config.proceed_timeout)?;
            page.click(selectors::PROCEED, 0)
        })?;

        self.state = PlaybackState::Playing { season, episode };
        self.play_video()
    }

    /// Start the loaded video and block until it is almost over.
    ///
    /// A timeout anywhere in here ends the video quietly.
    fn play_video(&self) -> Result<()> {
        match self.watch_video() {
            Err(e) if e.is_timeout() => {
                debug!("Video step timed out: {}", e);
                Ok(())
            }
            other => other,
        }
    }

    fn watch_video(&self) -> Result<()> {
        let page = self.page()?;

        if page.is_visible(selectors::POPUP)? {
            page.click(selectors::POPUP_DISMISS, 0)?;
        }

        page.wait_clickable(selectors::PLAY_BUTTON, self.config.play_button_timeout)?;
        page.click(selectors::PLAY_BUTTON, 0)?;

        self.toggle_fullscreen()?;
        std::thread::sleep(self.config.fullscreen_settle);

        while self.playing()? {
            std::thread::sleep(self.config.poll_interval);
        }

        self.toggle_fullscreen()
    }

    fn toggle_fullscreen(&self) -> Result<()> {
        if !self.config.fullscreen {
            return Ok(());
        }
        self.page()?.script_click(selectors::FULLSCREEN_TOGGLE)
    }

    /// Run `attempt` until it succeeds, retrying only on timeouts.
    fn with_retry<F>(&self, step: &str, mut attempt: F) -> Result<()>
    where
        F: FnMut(&Self) -> Result<()>,
    {
        let attempts = self.config.retry.max_attempts;
        for n in 1..=attempts {
            match attempt(self) {
                Ok(()) => return Ok(()),
                Err(e) if e.is_timeout() => {
                    warn!("Timed out loading {} (attempt {}/{})", step, n, attempts);
                }
                Err(e) => return Err(e),
            }
        }

        Err(SdarotError::RetriesExhausted {
            step: step.to_string(),
            attempts,
        })
    }
}

/// Index of the first item to play for a 1-based start number.
///
/// `None` when the start lies outside the `count` listed items.
fn start_offset(start: Option<u32>, count: usize) -> Option<usize> {
    match start {
        None => Some(0),
        Some(n) if n >= 1 && (n as usize) <= count => Some(n as usize - 1),
        Some(_) => None,
    }
}
