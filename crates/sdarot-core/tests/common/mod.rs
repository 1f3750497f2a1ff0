//! Scripted stand-in for the sdarot site and the browser showing it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use sdarot_core::page::selectors;
use sdarot_core::{Launcher, Page, Player, PlayerConfig, Result, SdarotError, SessionMode};

pub const SITE: &str = "https://sdarot.tv";
pub const SERIES_URL: &str = "https://sdarot.tv/watch/1234-fauda";

#[derive(Debug, Default)]
pub struct SiteState {
    /// (season label, episode labels)
    pub seasons: Vec<(String, Vec<String>)>,
    pub search_results: Vec<String>,
    pub search_renders: bool,

    pub url: String,
    pub typed: Vec<String>,
    pub selected_season: Option<usize>,
    pub selected_episode: Option<usize>,
    pub popup_visible: bool,

    /// Remaining-time texts handed out in order; `None` means no display
    pub remaining: VecDeque<Option<String>>,
    pub remaining_reads: usize,

    pub episode_list_timeouts: u32,
    pub proceed_timeouts: u32,
    pub play_button_timeouts: u32,
    pub crash_after_plays: Option<usize>,
    pub crashed: bool,

    pub launches: Vec<SessionMode>,
    pub live_sessions: usize,
    pub played: Vec<(String, String)>,
    pub season_clicks: usize,
    pub fullscreen_toggles: usize,
    pub popups_dismissed: usize,
    pub scrolls: Vec<(i64, i64)>,
}

impl SiteState {
    fn on_series_page(&self) -> bool {
        self.url.contains("/watch/")
    }
}

/// Shared handle to the scripted site; also the launcher
#[derive(Clone, Default)]
pub struct FakeSite(pub Rc<RefCell<SiteState>>);

impl FakeSite {
    /// Site with `episodes[i]` episodes in season `i + 1`
    pub fn with_seasons(episodes: &[u32]) -> Self {
        let site = FakeSite::default();
        site.0.borrow_mut().seasons = episodes
            .iter()
            .enumerate()
            .map(|(i, count)| {
                let labels: Vec<String> = (1..=*count).map(|e| e.to_string()).collect();
                ((i + 1).to_string(), labels)
            })
            .collect();
        site
    }

    pub fn state(&self) -> std::cell::Ref<'_, SiteState> {
        self.0.borrow()
    }

    pub fn state_mut(&self) -> std::cell::RefMut<'_, SiteState> {
        self.0.borrow_mut()
    }

    /// Labels played so far as (season, episode) numbers
    pub fn played(&self) -> Vec<(u32, u32)> {
        self.state()
            .played
            .iter()
            .map(|(s, e)| (s.parse().unwrap(), e.parse().unwrap()))
            .collect()
    }

    pub fn player(&self) -> Player<FakeSite> {
        let mut player = Player::new(self.clone(), PlayerConfig::immediate());
        player.set_site(SITE);
        player
    }
}

impl Launcher for FakeSite {
    type Page = FakePage;

    fn launch(&self, mode: SessionMode) -> Result<FakePage> {
        let mut state = self.0.borrow_mut();
        state.launches.push(mode);
        state.live_sessions += 1;
        state.crashed = false;
        state.url = "about:blank".to_string();
        Ok(FakePage { site: self.clone() })
    }
}

pub struct FakePage {
    site: FakeSite,
}

impl Drop for FakePage {
    fn drop(&mut self) {
        self.site.0.borrow_mut().live_sessions -= 1;
    }
}

impl FakePage {
    fn alive(&self) -> Result<std::cell::RefMut<'_, SiteState>> {
        let state = self.site.0.borrow_mut();
        if state.crashed {
            return Err(SdarotError::BrowserError("chrome not reachable".to_string()));
        }
        Ok(state)
    }
}

fn timeout(selector: &str) -> SdarotError {
    SdarotError::Timeout(selector.to_string())
}

impl Page for FakePage {
    fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.alive()?;
        state.url = url.to_string();
        state.selected_season = None;
        state.selected_episode = None;
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.alive()?.url.clone())
    }

    fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let mut state = self.alive()?;
        let texts = match selector {
            selectors::SEARCH_RESULTS if state.search_renders && !state.typed.is_empty() => {
                state.search_results.clone()
            }
            selectors::SEASONS if state.on_series_page() => {
                state.seasons.iter().map(|(label, _)| label.clone()).collect()
            }
            selectors::EPISODES => match state.selected_season {
                Some(season) => state.seasons[season].1.clone(),
                None => Vec::new(),
            },
            selectors::REMAINING_TIME => {
                state.remaining_reads += 1;
                match state.remaining.pop_front() {
                    Some(Some(text)) => vec![text],
                    Some(None) => Vec::new(),
                    None => vec!["-0:05".to_string()],
                }
            }
            _ => Vec::new(),
        };
        Ok(texts)
    }

    fn click(&self, selector: &str, index: usize) -> Result<()> {
        let mut state = self.alive()?;
        match selector {
            selectors::SEARCH_RESULTS if index < state.search_results.len() => {
                state.url = format!("{}/watch/{}", SITE, index + 1);
            }
            selectors::SEASONS if state.on_series_page() && index < state.seasons.len() => {
                state.selected_season = Some(index);
                state.selected_episode = None;
                state.season_clicks += 1;
            }
            selectors::EPISODES => {
                let season = state
                    .selected_season
                    .ok_or_else(|| SdarotError::ElementNotFound(selector.to_string()))?;
                if index >= state.seasons[season].1.len() {
                    return Err(SdarotError::ElementNotFound(selector.to_string()));
                }
                state.selected_episode = Some(index);
            }
            selectors::PROCEED => {}
            selectors::POPUP_DISMISS => {
                state.popup_visible = false;
                state.popups_dismissed += 1;
            }
            selectors::PLAY_BUTTON => {
                let (season, episode) = match (state.selected_season, state.selected_episode) {
                    (Some(s), Some(e)) => (s, e),
                    _ => return Err(SdarotError::ElementNotFound(selector.to_string())),
                };
                let played = (
                    state.seasons[season].0.clone(),
                    state.seasons[season].1[episode].clone(),
                );
                state.played.push(played);
                if state.crash_after_plays == Some(state.played.len()) {
                    state.crashed = true;
                }
            }
            _ => return Err(SdarotError::ElementNotFound(selector.to_string())),
        }
        Ok(())
    }

    fn script_click(&self, selector: &str) -> Result<()> {
        let mut state = self.alive()?;
        if selector == selectors::FULLSCREEN_TOGGLE {
            state.fullscreen_toggles += 1;
            Ok(())
        } else {
            Err(SdarotError::ElementNotFound(selector.to_string()))
        }
    }

    fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<()> {
        let mut state = self.alive()?;
        let ready = match selector {
            selectors::SEARCH_MENU => state.search_renders && !state.typed.is_empty(),
            selectors::SEASONS => state.on_series_page(),
            selectors::EPISODES => {
                if state.selected_season.is_none() {
                    false
                } else if state.episode_list_timeouts > 0 {
                    state.episode_list_timeouts -= 1;
                    false
                } else {
                    true
                }
            }
            _ => false,
        };
        if ready {
            Ok(())
        } else {
            Err(timeout(selector))
        }
    }

    fn wait_clickable(&self, selector: &str, _timeout: Duration) -> Result<()> {
        let mut state = self.alive()?;
        let ready = match selector {
            selectors::PROCEED => {
                if state.selected_episode.is_none() {
                    false
                } else if state.proceed_timeouts > 0 {
                    state.proceed_timeouts -= 1;
                    false
                } else {
                    true
                }
            }
            selectors::PLAY_BUTTON => {
                if state.play_button_timeouts > 0 {
                    state.play_button_timeouts -= 1;
                    false
                } else {
                    true
                }
            }
            _ => false,
        };
        if ready {
            Ok(())
        } else {
            Err(timeout(selector))
        }
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        let state = self.alive()?;
        Ok(selector == selectors::POPUP && state.popup_visible)
    }

    fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        let mut state = self.alive()?;
        if selector != selectors::SEARCH_INPUT {
            return Err(SdarotError::ElementNotFound(selector.to_string()));
        }
        state.typed.push(text.to_string());
        Ok(())
    }

    fn scroll_to(&self, x: i64, y: i64) -> Result<()> {
        self.alive()?.scrolls.push((x, y));
        Ok(())
    }
}
