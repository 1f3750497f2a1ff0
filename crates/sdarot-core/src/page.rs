//! Browser seam used by the playback driver
//!
//! The driver talks to one browser tab through the [`Page`] trait and gets
//! new tabs from a [`Launcher`]. The Chrome implementation lives in
//! [`crate::chrome`]; tests plug in a scripted page.

use std::time::Duration;

use crate::error::Result;
use crate::types::SessionMode;

/// CSS selectors for the elements the driver touches
pub mod selectors {
    /// Live-search input on the home page
    pub const SEARCH_INPUT: &str = "#liveSearch";
    /// Suggestion menu rendered by the live search
    pub const SEARCH_MENU: &str = ".typeahead.dropdown-menu";
    /// Entries of the suggestion menu
    pub const SEARCH_RESULTS: &str = ".typeahead.dropdown-menu li";
    /// Season buttons on a series page
    pub const SEASONS: &str = "#season li";
    /// Episode buttons of the selected season
    pub const EPISODES: &str = "#episode li";
    /// Control that must be clicked once the episode finished loading
    pub const PROCEED: &str = "#proceed";
    /// Optional interstitial popup
    pub const POPUP: &str = "#continue";
    /// Button closing the interstitial popup
    pub const POPUP_DISMISS: &str = "#continue .btn.btn-blue";
    /// video.js play button
    pub const PLAY_BUTTON: &str = ".vjs-big-play-button";
    /// video.js fullscreen toggle
    pub const FULLSCREEN_TOGGLE: &str = ".vjs-fullscreen-control.vjs-control.vjs-button";
    /// video.js remaining-time display
    pub const REMAINING_TIME: &str = ".vjs-remaining-time-display";
}

/// One browser tab.
///
/// Element lookups return [`crate::SdarotError::ElementNotFound`] when
/// nothing matches, waits return [`crate::SdarotError::Timeout`], and any
/// DevTools failure is a [`crate::SdarotError::BrowserError`].
pub trait Page {
    /// Load `url` and wait for navigation to finish
    fn navigate(&self, url: &str) -> Result<()>;

    /// URL currently shown
    fn current_url(&self) -> Result<String>;

    /// Visible text of every element matching `selector`, in document order
    fn texts(&self, selector: &str) -> Result<Vec<String>>;

    /// Click the `index`-th element matching `selector`
    fn click(&self, selector: &str, index: usize) -> Result<()>;

    /// Click the first match from page script, bypassing overlays
    fn script_click(&self, selector: &str) -> Result<()>;

    /// Wait until an element matching `selector` exists
    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Wait until an element matching `selector` is visible and enabled
    fn wait_clickable(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Whether the first match is displayed; false when nothing matches
    fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Focus the first match and type `text` into it
    fn type_text(&self, selector: &str, text: &str) -> Result<()>;

    /// Scroll the window to an absolute position
    fn scroll_to(&self, x: i64, y: i64) -> Result<()>;
}

/// Starts browser sessions
pub trait Launcher {
    type Page: Page;

    /// Start a fresh browser with one tab
    fn launch(&self, mode: SessionMode) -> Result<Self::Page>;
}

/// An owned browser session.
///
/// Dropping the session tears the browser down.
pub struct Session<P: Page> {
    page: P,
}

impl<P: Page> Session<P> {
    /// Launch a session and load `url` in it
    pub fn open<L>(launcher: &L, mode: SessionMode, url: &str) -> Result<Self>
    where
        L: Launcher<Page = P>,
    {
        let page = launcher.launch(mode)?;
        page.navigate(url)?;
        Ok(Self { page })
    }

    pub fn page(&self) -> &P {
        &self.page
    }
}
