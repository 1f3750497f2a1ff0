//! Chrome implementation of the browser seam
//!
//! Uses `headless_chrome` over the DevTools protocol. Most queries run as
//! page script so one round trip answers them; real clicks go through
//! DevTools input events.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use headless_chrome::{Browser, LaunchOptions, Tab};
use log::debug;

use crate::error::{Result, SdarotError};
use crate::page::{Launcher, Page};
use crate::types::SessionMode;

/// Configuration for Chrome sessions
#[derive(Debug, Clone)]
pub struct ChromeConfig {
    /// Chrome/Chromium binary, auto-detected when `None`
    pub chrome_path: Option<PathBuf>,
    /// Window size for headless sessions
    pub window_size: (u32, u32),
    /// Start visible sessions maximized (default: true)
    pub maximize: bool,
    /// Custom user agent
    pub user_agent: Option<String>,
    /// How long the DevTools connection may stay silent (default: 10 min)
    pub idle_timeout: Duration,
    /// Interval between checks while waiting for an element (default: 100ms)
    pub poll_interval: Duration,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            chrome_path: None,
            window_size: (1920, 1080),
            maximize: true,
            user_agent: None,
            idle_timeout: Duration::from_secs(600),
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl ChromeConfig {
    /// Extra command-line flags for a session in `mode`
    fn chrome_args(&self, mode: SessionMode) -> Vec<String> {
        let mut args = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--autoplay-policy=no-user-gesture-required".to_string(),
        ];
        if mode == SessionMode::Visible && self.maximize {
            args.push("--start-maximized".to_string());
        }
        if let Some(ua) = &self.user_agent {
            args.push(format!("--user-agent={}", ua));
        }
        args
    }
}

/// Launches Chrome sessions
pub struct ChromeLauncher {
    config: ChromeConfig,
}

impl ChromeLauncher {
    pub fn new(config: ChromeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChromeConfig {
        &self.config
    }
}

impl Default for ChromeLauncher {
    fn default() -> Self {
        Self::new(ChromeConfig::default())
    }
}

impl Launcher for ChromeLauncher {
    type Page = ChromePage;

    fn launch(&self, mode: SessionMode) -> Result<ChromePage> {
        // Owned flags first so the borrowed OsStr list outlives the builder
        let owned_args = self.config.chrome_args(mode);
        let args: Vec<&OsStr> = owned_args.iter().map(OsStr::new).collect();

        let window_size = match mode {
            SessionMode::Headless => Some(self.config.window_size),
            SessionMode::Visible if self.config.maximize => None,
            SessionMode::Visible => Some(self.config.window_size),
        };

        let options = LaunchOptions::default_builder()
            .headless(mode == SessionMode::Headless)
            .window_size(window_size)
            .path(self.config.chrome_path.clone())
            .idle_browser_timeout(self.config.idle_timeout)
            .args(args)
            .build()
            .map_err(|e| SdarotError::BrowserError(format!("Invalid launch options: {}", e)))?;

        debug!("Launching Chrome ({:?})", mode);
        let browser = Browser::new(options)
            .map_err(|e| SdarotError::BrowserError(format!("Chrome failed to start: {}", e)))?;
        let tab = browser
            .wait_for_initial_tab()
            .map_err(|e| SdarotError::BrowserError(format!("No initial tab: {}", e)))?;

        Ok(ChromePage {
            tab,
            _browser: browser,
            poll_interval: self.config.poll_interval,
        })
    }
}

/// A Chrome tab; dropping it closes the browser
pub struct ChromePage {
    tab: Arc<Tab>,
    // Declared after `tab` so the process outlives the tab handle
    _browser: Browser,
    poll_interval: Duration,
}

/// Quote `s` as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn visibility_check(selector: &str, require_enabled: bool) -> String {
    format!(
        r#"(() => {{
            const e = document.querySelector({sel});
            if (!e) return false;
            const r = e.getBoundingClientRect();
            const s = window.getComputedStyle(e);
            return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none'{enabled};
        }})()"#,
        sel = js_string(selector),
        enabled = if require_enabled { " && !e.disabled" } else { "" },
    )
}

impl ChromePage {
    fn eval(&self, script: &str) -> Result<Option<serde_json::Value>> {
        self.tab
            .evaluate(script, false)
            .map(|object| object.value)
            .map_err(|e| SdarotError::BrowserError(format!("Script failed: {}", e)))
    }

    fn eval_bool(&self, script: &str) -> Result<bool> {
        Ok(self.eval(script)?.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    /// Poll `script` until it yields true.
    ///
    /// Script errors are tolerated while the page reloads; if they persist
    /// until the deadline the last one is returned instead of a timeout.
    fn wait_until(&self, script: &str, timeout: Duration, what: &str) -> Result<()> {
        let start = Instant::now();
        let mut last_error = None;

        loop {
            match self.eval_bool(script) {
                Ok(true) => return Ok(()),
                Ok(false) => last_error = None,
                Err(e) => last_error = Some(e),
            }

            if start.elapsed() >= timeout {
                return Err(last_error.unwrap_or_else(|| SdarotError::Timeout(what.to_string())));
            }

            std::thread::sleep(self.poll_interval);
        }
    }
}

impl Page for ChromePage {
    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| SdarotError::BrowserError(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| SdarotError::BrowserError(format!("Navigation timeout for {}: {}", url, e)))?;

        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let script = format!(
            "JSON.stringify(Array.from(document.querySelectorAll({})).map(e => e.innerText))",
            js_string(selector)
        );
        let raw = self
            .eval(&script)?
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| SdarotError::BrowserError("Script returned no value".to_string()))?;

        serde_json::from_str(&raw)
            .map_err(|e| SdarotError::ParseError(format!("texts of {}: {}", selector, e)))
    }

    fn click(&self, selector: &str, index: usize) -> Result<()> {
        let elements = self
            .tab
            .find_elements(selector)
            .map_err(|_| SdarotError::ElementNotFound(selector.to_string()))?;
        let element = elements
            .get(index)
            .ok_or_else(|| SdarotError::ElementNotFound(format!("{} #{}", selector, index)))?;

        element
            .click()
            .map_err(|e| SdarotError::BrowserError(format!("Click on {} failed: {}", selector, e)))?;
        Ok(())
    }

    fn script_click(&self, selector: &str) -> Result<()> {
        let script = format!(
            "(() => {{ const e = document.querySelector({}); if (!e) return false; e.click(); return true; }})()",
            js_string(selector)
        );
        if self.eval_bool(&script)? {
            Ok(())
        } else {
            Err(SdarotError::ElementNotFound(selector.to_string()))
        }
    }

    fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        let script = format!("document.querySelector({}) !== null", js_string(selector));
        self.wait_until(&script, timeout, selector)
    }

    fn wait_clickable(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.wait_until(&visibility_check(selector, true), timeout, selector)
    }

    fn is_visible(&self, selector: &str) -> Result<bool> {
        self.eval_bool(&visibility_check(selector, false))
    }

    fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        let element = self
            .tab
            .find_element(selector)
            .map_err(|_| SdarotError::ElementNotFound(selector.to_string()))?;

        element
            .type_into(text)
            .map_err(|e| SdarotError::BrowserError(format!("Typing into {} failed: {}", selector, e)))?;
        Ok(())
    }

    fn scroll_to(&self, x: i64, y: i64) -> Result<()> {
        self.eval(&format!("window.scrollTo({}, {})", x, y))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ChromeConfig::default();
        assert!(config.chrome_path.is_none());
        assert!(config.maximize);
        assert_eq!(config.window_size, (1920, 1080));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_visible_args_maximized() {
        let config = ChromeConfig::default();
        let args = config.chrome_args(SessionMode::Visible);
        assert!(args.iter().any(|a| a == "--start-maximized"));

        let headless = config.chrome_args(SessionMode::Headless);
        assert!(!headless.iter().any(|a| a == "--start-maximized"));
    }

    #[test]
    fn test_args_user_agent() {
        let config = ChromeConfig {
            user_agent: Some("TestAgent/1.0".to_string()),
            maximize: false,
            ..ChromeConfig::default()
        };
        let args = config.chrome_args(SessionMode::Visible);
        assert!(args.contains(&"--user-agent=TestAgent/1.0".to_string()));
        assert!(!args.iter().any(|a| a == "--start-maximized"));
    }

    #[test]
    fn test_js_string_escapes() {
        assert_eq!(js_string("#season li"), "\"#season li\"");
        assert_eq!(js_string("a'b\"c"), "\"a'b\\\"c\"");
    }

    #[test]
    fn test_visibility_check_script() {
        let script = visibility_check("#proceed", true);
        assert!(script.contains("document.querySelector(\"#proceed\")"));
        assert!(script.contains("!e.disabled"));
        assert!(!visibility_check("#continue", false).contains("disabled"));
    }
}
