//! Headless Chrome implementation of [`BrowserSession`].
//!
//! Readiness is tracked through Chrome's page lifecycle events. A listener is
//! attached before navigating; it forgets everything it has seen whenever the
//! main frame starts a new document (`init`), so only events belonging to the
//! navigated document count.
//!
//! | Strategy | Lifecycle event |
//! |----------|-----------------|
//! | `network-idle-strict` | `networkIdle` |
//! | `network-idle-lenient` | `networkAlmostIdle` |
//! | `dom-content-loaded` | `DOMContentLoaded` |
//! | `load-complete` | `load` |

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use headless_chrome::protocol::cdp::Page;
use headless_chrome::protocol::cdp::types::Event;
use headless_chrome::types::Bounds;
use headless_chrome::{Browser, Tab};
use url::Url;

use super::{BrowserSession, call_with_deadline, capture_surface, next_session_id};
use crate::error::{BrowserError, Result};
use crate::service::{ImageFormat, Viewport, WaitStrategy, truncate_url};

/// How often navigation polls for the readiness event.
const READINESS_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Measures the scrollable document height after layout.
const DOCUMENT_HEIGHT_JS: &str = "Math.max(\
    document.documentElement ? document.documentElement.scrollHeight : 0, \
    document.body ? document.body.scrollHeight : 0)";

/// Lifecycle events observed for the current main-frame document.
#[derive(Debug, Default)]
struct Lifecycle {
    /// Set once the navigated document has started (`init`).
    started: bool,
    fired: HashSet<String>,
}

impl Lifecycle {
    fn record(&mut self, name: &str) {
        if name == "init" {
            self.started = true;
            self.fired.clear();
        } else if self.started {
            self.fired.insert(name.to_string());
        }
    }

    fn has_fired(&self, name: &str) -> bool {
        self.started && self.fired.contains(name)
    }
}

/// A headless Chrome process with a single tab.
///
/// Dropping the [`Browser`] terminates the process and removes its
/// temporary profile directory, so [`close`](BrowserSession::close) only
/// needs to close the tab and drop the browser.
pub struct ChromeSession {
    id: u64,
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    viewport: Viewport,
}

impl ChromeSession {
    /// Wrap a freshly launched browser.
    pub fn new(browser: Browser) -> Self {
        Self {
            id: next_session_id(),
            browser: Some(browser),
            tab: None,
            viewport: Viewport::default(),
        }
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| BrowserError::Page("no page open in this session".to_string()))
    }

    fn resize(tab: &Tab, surface: Viewport) -> std::result::Result<(), String> {
        tab.set_bounds(Bounds::Normal {
            left: Some(0),
            top: Some(0),
            width: Some(f64::from(surface.width)),
            height: Some(f64::from(surface.height)),
        })
        .map(|_| ())
        .map_err(|e| e.to_string())
    }

    fn document_height(tab: &Tab) -> Result<u32> {
        let result = tab
            .evaluate(DOCUMENT_HEIGHT_JS, false)
            .map_err(|e| BrowserError::Render(format!("failed to measure document: {}", e)))?;

        let height = result
            .value
            .and_then(|v| v.as_f64())
            .ok_or_else(|| BrowserError::Render("document height is not a number".to_string()))?;

        Ok(height.clamp(0.0, f64::from(u32::MAX)).ceil() as u32)
    }

    /// Poll until `wait`'s lifecycle event has fired for the new document.
    ///
    /// `timeout` is what is left of the navigation deadline.
    fn await_lifecycle(
        &self,
        lifecycle: &Mutex<Lifecycle>,
        url: &Url,
        wait: WaitStrategy,
        timeout: Duration,
    ) -> Result<()> {
        let started = Instant::now();
        let event = wait.lifecycle_event();

        loop {
            let ready = lifecycle
                .lock()
                .map(|seen| seen.has_fired(event))
                .unwrap_or(false);

            if ready {
                log::trace!("Session {}: '{}' after {:?}", self.id, event, started.elapsed());
                return Ok(());
            }

            if started.elapsed() >= timeout {
                return Err(BrowserError::NavigationTimeout(format!(
                    "{} not reached for {} within {:?}",
                    wait,
                    truncate_url(url.as_str(), 100),
                    timeout
                )));
            }

            std::thread::sleep(READINESS_POLL_INTERVAL);
        }
    }
}

impl BrowserSession for ChromeSession {
    fn id(&self) -> u64 {
        self.id
    }

    fn open_page(&mut self, viewport: Viewport) -> Result<()> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| BrowserError::Page("browser already closed".to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::Page(format!("failed to open tab: {}", e)))?;

        tab.call_method(Page::SetLifecycleEventsEnabled { enabled: true })
            .map_err(|e| BrowserError::Page(format!("failed to enable lifecycle events: {}", e)))?;

        Self::resize(&tab, viewport)
            .map_err(|e| BrowserError::Page(format!("failed to set viewport {}: {}", viewport, e)))?;

        log::trace!("Session {}: tab opened at {}", self.id, viewport);

        self.viewport = viewport;
        self.tab = Some(tab);
        Ok(())
    }

    fn navigate(&mut self, url: &Url, wait: WaitStrategy, timeout: Duration) -> Result<()> {
        let tab = Arc::clone(self.tab()?);
        tab.set_default_timeout(timeout);

        let main_frame = tab.get_target_id().clone();
        let lifecycle = Arc::new(Mutex::new(Lifecycle::default()));

        let listener = {
            let lifecycle = Arc::clone(&lifecycle);
            tab.add_event_listener(Arc::new(move |event: &Event| {
                if let Event::PageLifecycleEvent(e) = event {
                    if e.params.frame_id == main_frame {
                        if let Ok(mut seen) = lifecycle.lock() {
                            seen.record(&e.params.name);
                        }
                    }
                }
            }))
            .map_err(|e| BrowserError::Navigation(format!("failed to watch page lifecycle: {}", e)))?
        };

        // One deadline covers both the navigation request and the readiness wait.
        let deadline = Instant::now() + timeout;
        let outcome = {
            let tab = Arc::clone(&tab);
            let target = url.to_string();
            call_with_deadline(timeout, "navigate", move || {
                tab.navigate_to(&target)
                    .map(|_| ())
                    .map_err(|e| BrowserError::Navigation(e.to_string()))
            })
        }
        .and_then(|_| {
            let remaining = deadline.saturating_duration_since(Instant::now());
            self.await_lifecycle(&lifecycle, url, wait, remaining)
        });

        if let Err(e) = tab.remove_event_listener(&listener) {
            log::trace!("Session {}: failed to remove lifecycle listener: {}", self.id, e);
        }

        outcome
    }

    fn render(&mut self, format: ImageFormat, full_page: bool) -> Result<Vec<u8>> {
        let tab = Arc::clone(self.tab()?);

        if full_page {
            let document_height = Self::document_height(&tab)?;
            let surface = capture_surface(self.viewport, document_height, true);
            if surface != self.viewport {
                log::trace!(
                    "Session {}: extending surface to {} for full-page capture",
                    self.id,
                    surface
                );
                Self::resize(&tab, surface).map_err(|e| {
                    BrowserError::Render(format!("failed to extend surface to {}: {}", surface, e))
                })?;
            }
        }

        let chrome_format = match format {
            ImageFormat::Png => Page::CaptureScreenshotFormatOption::Png,
            ImageFormat::Jpeg => Page::CaptureScreenshotFormatOption::Jpeg,
            ImageFormat::Webp => Page::CaptureScreenshotFormatOption::Webp,
        };

        let bytes = tab
            .capture_screenshot(chrome_format, format.quality(), None, true)
            .map_err(|e| BrowserError::Render(e.to_string()))?;

        if bytes.is_empty() {
            return Err(BrowserError::Render("browser returned an empty image".to_string()));
        }

        Ok(bytes)
    }

    fn close(&mut self) -> Result<()> {
        let tab_result = match self.tab.take() {
            Some(tab) => tab.close(true).map(|_| ()).map_err(|e| e.to_string()),
            None => Ok(()),
        };

        // Dropping the browser kills the process even if the tab refused to close.
        drop(self.browser.take());

        tab_result.map_err(|e| BrowserError::Teardown(format!("failed to close tab: {}", e)))
    }
}

impl std::fmt::Debug for ChromeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromeSession")
            .field("id", &self.id)
            .field("viewport", &self.viewport)
            .field("open", &self.browser.is_some())
            .finish()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_ignores_events_before_init() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.record("load");
        assert!(!lifecycle.has_fired("load"));

        lifecycle.record("init");
        lifecycle.record("DOMContentLoaded");
        assert!(lifecycle.has_fired("DOMContentLoaded"));
        assert!(!lifecycle.has_fired("load"));
    }

    #[test]
    fn test_lifecycle_resets_on_new_document() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.record("init");
        lifecycle.record("networkIdle");
        assert!(lifecycle.has_fired("networkIdle"));

        lifecycle.record("init");
        assert!(!lifecycle.has_fired("networkIdle"));
    }
}
