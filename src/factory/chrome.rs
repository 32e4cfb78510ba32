//! Chrome/Chromium browser factory implementation.
//!
//! This module provides [`ChromeBrowserFactory`] for launching isolated
//! headless Chrome sessions with screenshot-friendly configurations.
//!
//! # Overview
//!
//! The factory handles:
//! - Chrome binary path detection (or custom path)
//! - Launch options configuration
//! - One fresh process (and temporary profile) per capture
//!
//! # Example
//!
//! ```rust,ignore
//! use webshot_api::ChromeBrowserFactory;
//!
//! // Auto-detect Chrome installation
//! let factory = ChromeBrowserFactory::with_defaults();
//!
//! // Or specify custom path
//! let factory = ChromeBrowserFactory::with_path("/usr/bin/google-chrome".to_string());
//! ```

use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions};

use super::BrowserFactory;
use crate::error::{BrowserError, Result};
use crate::session::{BrowserSession, ChromeSession};

/// How long Chrome may stay silent before the connection is considered dead.
///
/// Must comfortably exceed any navigation timeout, since a page that is
/// still loading produces no events for the session to consume.
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(300);

/// Factory for launching Chrome/Chromium sessions.
///
/// Handles Chrome-specific launch options and path detection.
///
/// # Thread Safety
///
/// This factory is `Send + Sync` and is shared by all concurrent captures.
pub struct ChromeBrowserFactory {
    /// Function that generates launch options for each browser.
    launch_options_fn: Box<dyn Fn() -> Result<LaunchOptions<'static>> + Send + Sync>,
}

impl ChromeBrowserFactory {
    /// Create factory with custom launch options function.
    ///
    /// This is the most flexible constructor, allowing full control
    /// over launch options generation.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use webshot_api::{ChromeBrowserFactory, create_chrome_options};
    ///
    /// let factory = ChromeBrowserFactory::new(|| create_chrome_options(Some("/custom/path")));
    /// ```
    pub fn new<F>(launch_options_fn: F) -> Self
    where
        F: Fn() -> Result<LaunchOptions<'static>> + Send + Sync + 'static,
    {
        Self {
            launch_options_fn: Box::new(launch_options_fn),
        }
    }

    /// Create factory with auto-detected Chrome path.
    ///
    /// # Platform Detection
    ///
    /// The `headless_chrome` crate searches common installation paths:
    ///
    /// | Platform | Paths Searched |
    /// |----------|----------------|
    /// | Linux | `/usr/bin/google-chrome`, `/usr/bin/chromium`, etc. |
    /// | macOS | `/Applications/Google Chrome.app/...` |
    /// | Windows | `C:\Program Files\Google\Chrome\...` |
    pub fn with_defaults() -> Self {
        log::debug!("🔧 Creating ChromeBrowserFactory with auto-detect");
        Self::new(|| create_chrome_options(None))
    }

    /// Create factory with custom Chrome binary path.
    pub fn with_path(chrome_path: String) -> Self {
        log::debug!("🔧 Creating ChromeBrowserFactory with custom path: {}", chrome_path);
        Self::new(move || create_chrome_options(Some(&chrome_path)))
    }

    /// Create factory from an optional path, auto-detecting when `None`.
    pub fn from_path(chrome_path: Option<String>) -> Self {
        match chrome_path {
            Some(path) => Self::with_path(path),
            None => Self::with_defaults(),
        }
    }
}

impl BrowserFactory for ChromeBrowserFactory {
    /// Launch a new Chrome process and wrap it in a [`ChromeSession`].
    ///
    /// # Errors
    ///
    /// * Returns [`BrowserError::Configuration`] if launch options generation fails.
    /// * Returns [`BrowserError::Launch`] if Chrome fails to start.
    fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        log::trace!("🔧 ChromeBrowserFactory::launch() called");

        let options = (self.launch_options_fn)()?;

        log::debug!("🚀 Launching Chrome browser...");
        let browser = Browser::new(options).map_err(|e| {
            log::error!("❌ Chrome launch failed: {}", e);
            BrowserError::Launch(e.to_string())
        })?;

        Ok(Box::new(ChromeSession::new(browser)))
    }
}

/// Create Chrome launch options with optional custom path.
///
/// Every launch gets headless_chrome's own temporary user-data directory,
/// so no profile state is shared between sessions.
///
/// # Chrome Flags Applied
///
/// ## Memory and Stability
/// - `--disable-dev-shm-usage` - Use /tmp instead of /dev/shm (container-friendly)
/// - `--disable-crash-reporter`
/// - `--disable-hang-monitor`
///
/// ## Rendering
/// - `--hide-scrollbars` - Keep scrollbars out of screenshots
/// - `--force-device-scale-factor=1` - One image pixel per CSS pixel
/// - `--font-render-hinting=none` - Stable glyph rendering across hosts
/// - `--disable-gpu`
///
/// ## Disabled Features
/// - `--disable-extensions`
/// - `--disable-sync`
/// - `--disable-default-apps`
/// - `--mute-audio`
/// - `--no-first-run`
///
/// ## Background Throttling
/// - `--disable-background-timer-throttling`
/// - `--disable-backgrounding-occluded-windows`
/// - `--disable-renderer-backgrounding`
///
/// # Errors
///
/// Returns [`BrowserError::Configuration`] if the options builder rejects
/// the configuration.
pub fn create_chrome_options(chrome_path: Option<&str>) -> Result<LaunchOptions<'static>> {
    match chrome_path {
        Some(path) => log::debug!("🔧 Creating Chrome options with custom path: {}", path),
        None => log::debug!("🔧 Creating Chrome options (auto-detect browser)"),
    }

    let mut builder = LaunchOptions::default_builder();

    if let Some(path) = chrome_path {
        builder.path(Some(path.to_string().into()));
    }

    builder
        .headless(true)
        .sandbox(false) // required in most containers
        .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
        .args(vec![
            "--disable-dev-shm-usage".as_ref(),
            "--disable-crash-reporter".as_ref(),
            "--disable-hang-monitor".as_ref(),
            "--hide-scrollbars".as_ref(),
            "--force-device-scale-factor=1".as_ref(),
            "--font-render-hinting=none".as_ref(),
            "--disable-gpu".as_ref(),
            "--disable-extensions".as_ref(),
            "--disable-sync".as_ref(),
            "--disable-default-apps".as_ref(),
            "--mute-audio".as_ref(),
            "--no-first-run".as_ref(),
            "--disable-background-timer-throttling".as_ref(),
            "--disable-backgrounding-occluded-windows".as_ref(),
            "--disable-renderer-backgrounding".as_ref(),
        ])
        .build()
        .map_err(|e| {
            let path_msg = chrome_path.unwrap_or("auto-detect");
            log::error!(
                "❌ Failed to build Chrome launch options (path: {}): {}",
                path_msg,
                e
            );
            BrowserError::Configuration(e.to_string())
        })
}

// ============================================================================
// Unit Tests
// ============================================================================
