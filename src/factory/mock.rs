//! Mock browser factory for testing.
//!
//! This module provides a scripted implementation of [`BrowserFactory`]
//! whose sessions never start a real browser. Each stage can be made to
//! fail, and shared counters record what happened, so pipeline behaviour
//! can be tested without Chrome installed.
//!
//! # Feature Flag
//!
//! This module is only available when:
//! - The `test-utils` feature is enabled, OR
//! - During testing (`#[cfg(test)]`)
//!
//! # Example
//!
//! ```rust,ignore
//! use webshot_api::factory::mock::{MockBrowserFactory, MockStage};
//!
//! // Launch always fails
//! let factory = MockBrowserFactory::always_fails("Chrome not installed");
//!
//! // Navigation fails with a DNS error
//! let factory = MockBrowserFactory::failing_at(MockStage::Navigate, "net::ERR_NAME_NOT_RESOLVED");
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use url::Url;

use super::BrowserFactory;
use crate::error::{BrowserError, Result};
use crate::service::{ImageFormat, Viewport, WaitStrategy};
use crate::session::{BrowserSession, call_with_deadline, capture_surface, next_session_id};

/// Session stage a [`MockBrowserFactory`] can be told to fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockStage {
    /// [`BrowserFactory::launch`]
    Launch,
    /// [`BrowserSession::open_page`]
    OpenPage,
    /// [`BrowserSession::navigate`]
    Navigate,
    /// [`BrowserSession::render`]
    Render,
    /// [`BrowserSession::close`]
    Close,
}

/// What the factory's sessions should do.
#[derive(Debug, Clone)]
struct Script {
    fail_at: Option<MockStage>,
    error_message: String,
    fail_after: Option<usize>,
    hang_navigation: bool,
    stuck_navigation: bool,
    navigation_delay: Option<Duration>,
    document_height: u32,
}

/// Everything the sessions report back, shared with every [`MockObserver`].
#[derive(Debug, Default)]
struct Recorder {
    launches: AtomicUsize,
    closes: AtomicUsize,
    live: AtomicUsize,
    peak_live: AtomicUsize,
    released_navigations: AtomicUsize,
    navigations: Mutex<Vec<(String, WaitStrategy)>>,
    surfaces: Mutex<Vec<Viewport>>,
}

/// Set by `close`, waited on by a stuck navigation.
type ClosedFlag = Arc<(Mutex<bool>, Condvar)>;

/// Mock browser factory for testing without Chrome.
///
/// This factory can be configured to:
/// - Always succeed, rendering a small fake image
/// - Fail at a chosen [`MockStage`]
/// - Fail to launch after N successful launches
/// - Never reach the readiness condition (navigation runs into its timeout)
/// - Block inside the navigation request until the session is closed
/// - Take a fixed time to navigate
/// - Report a document height for full-page captures
///
/// # Thread Safety
///
/// This factory is `Send + Sync` and tracks state using atomics and mutexes.
pub struct MockBrowserFactory {
    script: Script,
    recorder: Arc<Recorder>,
}

impl MockBrowserFactory {
    /// Create a mock factory whose sessions always succeed.
    pub fn new() -> Self {
        Self {
            script: Script {
                fail_at: None,
                error_message: String::new(),
                fail_after: None,
                hang_navigation: false,
                stuck_navigation: false,
                navigation_delay: None,
                document_height: 1024,
            },
            recorder: Arc::new(Recorder::default()),
        }
    }

    /// Create a mock factory that always fails to launch.
    pub fn always_fails<S: Into<String>>(message: S) -> Self {
        Self::failing_at(MockStage::Launch, message)
    }

    /// Create a mock factory whose sessions fail at `stage` with `message`.
    pub fn failing_at<S: Into<String>>(stage: MockStage, message: S) -> Self {
        let mut factory = Self::new();
        factory.script.fail_at = Some(stage);
        factory.script.error_message = message.into();
        factory
    }

    /// Create a mock factory that fails to launch after N successful launches.
    ///
    /// Useful for resource-exhaustion scenarios.
    pub fn fail_after_n<S: Into<String>>(n: usize, message: S) -> Self {
        let mut factory = Self::new();
        factory.script.fail_after = Some(n);
        factory.script.error_message = message.into();
        factory
    }

    /// Create a mock factory whose navigations never become ready.
    ///
    /// `navigate` blocks for the whole timeout it is given and then returns
    /// [`BrowserError::NavigationTimeout`].
    pub fn hanging_navigation() -> Self {
        let mut factory = Self::new();
        factory.script.hang_navigation = true;
        factory
    }

    /// Create a mock factory whose navigation request itself never returns.
    ///
    /// The request only unblocks when the session is closed, like a browser
    /// whose page load hangs until the process is killed.
    pub fn stuck_navigation() -> Self {
        let mut factory = Self::new();
        factory.script.stuck_navigation = true;
        factory
    }

    /// Make every successful navigation take `delay`.
    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.script.navigation_delay = Some(delay);
        self
    }

    /// Set the document height reported to full-page captures.
    pub fn with_document_height(mut self, height: u32) -> Self {
        self.script.document_height = height;
        self
    }

    /// Number of launch attempts by this factory.
    pub fn launch_count(&self) -> usize {
        self.recorder.launches.load(Ordering::SeqCst)
    }

    /// Number of `close` calls across all sessions of this factory.
    pub fn close_count(&self) -> usize {
        self.recorder.closes.load(Ordering::SeqCst)
    }

    /// Handle for inspecting what the sessions did, usable after the factory moved.
    pub fn observer(&self) -> MockObserver {
        MockObserver {
            recorder: Arc::clone(&self.recorder),
        }
    }

    fn failure(&self, stage: MockStage) -> Option<String> {
        (self.script.fail_at == Some(stage)).then(|| self.script.error_message.clone())
    }
}

impl Default for MockBrowserFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserFactory for MockBrowserFactory {
    fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let count = self.recorder.launches.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = self.failure(MockStage::Launch) {
            log::debug!("MockBrowserFactory: Returning configured launch failure");
            return Err(BrowserError::Launch(message));
        }

        if let Some(fail_after) = self.script.fail_after {
            if count >= fail_after {
                log::debug!("MockBrowserFactory: Failing after {} launches", fail_after);
                return Err(BrowserError::Launch(self.script.error_message.clone()));
            }
        }

        log::debug!("MockBrowserFactory: Launching mock session #{}", count + 1);

        let live = self.recorder.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.recorder.peak_live.fetch_max(live, Ordering::SeqCst);

        Ok(Box::new(MockSession {
            id: next_session_id(),
            script: self.script.clone(),
            recorder: Arc::clone(&self.recorder),
            viewport: None,
            navigated: false,
            closed: Arc::new((Mutex::new(false), Condvar::new())),
        }))
    }
}

impl std::fmt::Debug for MockBrowserFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBrowserFactory")
            .field("fail_at", &self.script.fail_at)
            .field("error_message", &self.script.error_message)
            .field("fail_after", &self.script.fail_after)
            .field("hang_navigation", &self.script.hang_navigation)
            .field("stuck_navigation", &self.script.stuck_navigation)
            .field("launch_count", &self.launch_count())
            .finish()
    }
}

/// Read-only view of what a [`MockBrowserFactory`]'s sessions did.
#[derive(Debug, Clone)]
pub struct MockObserver {
    recorder: Arc<Recorder>,
}

impl MockObserver {
    /// Number of launch attempts.
    pub fn launches(&self) -> usize {
        self.recorder.launches.load(Ordering::SeqCst)
    }

    /// Number of `close` calls.
    pub fn closes(&self) -> usize {
        self.recorder.closes.load(Ordering::SeqCst)
    }

    /// Sessions launched and not yet closed.
    pub fn live_sessions(&self) -> usize {
        self.recorder.live.load(Ordering::SeqCst)
    }

    /// Most sessions that were ever open at the same time.
    pub fn peak_live_sessions(&self) -> usize {
        self.recorder.peak_live.load(Ordering::SeqCst)
    }

    /// Stuck navigation requests that have since returned.
    pub fn released_navigations(&self) -> usize {
        self.recorder.released_navigations.load(Ordering::SeqCst)
    }

    /// URLs navigated to, with their wait strategy, in call order.
    pub fn navigations(&self) -> Vec<(String, WaitStrategy)> {
        self.recorder
            .navigations
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    /// Surfaces rendered, in call order.
    pub fn rendered_surfaces(&self) -> Vec<Viewport> {
        self.recorder
            .surfaces
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

/// Minimal, recognisable payloads for each format.
fn fake_image(format: ImageFormat, surface: Viewport) -> Vec<u8> {
    let mut bytes = match format {
        ImageFormat::Png => vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        ImageFormat::Jpeg => vec![0xFF, 0xD8, 0xFF, 0xE0],
        ImageFormat::Webp => b"RIFF\0\0\0\0WEBP".to_vec(),
    };
    bytes.extend_from_slice(&surface.width.to_be_bytes());
    bytes.extend_from_slice(&surface.height.to_be_bytes());
    bytes
}

struct MockSession {
    id: u64,
    script: Script,
    recorder: Arc<Recorder>,
    viewport: Option<Viewport>,
    navigated: bool,
    closed: ClosedFlag,
}

impl MockSession {
    fn failure(&self, stage: MockStage) -> Option<String> {
        (self.script.fail_at == Some(stage)).then(|| self.script.error_message.clone())
    }

    /// Block until `close` runs, the way a hung page load does.
    fn wait_for_close(closed: &ClosedFlag) {
        let (lock, signal) = &**closed;
        let Ok(mut is_closed) = lock.lock() else {
            return;
        };
        while !*is_closed {
            match signal.wait(is_closed) {
                Ok(guard) => is_closed = guard,
                Err(_) => return,
            }
        }
    }

    /// Returns `true` the first time it is called.
    fn mark_closed(&self) -> bool {
        let (lock, signal) = &*self.closed;
        let mut is_closed = match lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let first = !*is_closed;
        *is_closed = true;
        signal.notify_all();
        first
    }
}

impl BrowserSession for MockSession {
    fn id(&self) -> u64 {
        self.id
    }

    fn open_page(&mut self, viewport: Viewport) -> Result<()> {
        if let Some(message) = self.failure(MockStage::OpenPage) {
            return Err(BrowserError::Page(message));
        }
        self.viewport = Some(viewport);
        Ok(())
    }

    fn navigate(&mut self, url: &Url, wait: WaitStrategy, timeout: Duration) -> Result<()> {
        if self.viewport.is_none() {
            return Err(BrowserError::Navigation("no page open".to_string()));
        }

        if let Ok(mut navigations) = self.recorder.navigations.lock() {
            navigations.push((url.to_string(), wait));
        }

        if let Some(message) = self.failure(MockStage::Navigate) {
            return Err(BrowserError::Navigation(message));
        }

        if self.script.stuck_navigation {
            let closed = Arc::clone(&self.closed);
            let recorder = Arc::clone(&self.recorder);
            return call_with_deadline(timeout, "navigate", move || {
                Self::wait_for_close(&closed);
                recorder.released_navigations.fetch_add(1, Ordering::SeqCst);
                Err(BrowserError::Navigation("session closed during navigation".to_string()))
            });
        }

        if let Some(delay) = self.script.navigation_delay {
            std::thread::sleep(delay);
        }

        if self.script.hang_navigation {
            std::thread::sleep(timeout);
            return Err(BrowserError::NavigationTimeout(format!(
                "{} not reached within {:?}",
                wait, timeout
            )));
        }

        self.navigated = true;
        Ok(())
    }

    fn render(&mut self, format: ImageFormat, full_page: bool) -> Result<Vec<u8>> {
        if let Some(message) = self.failure(MockStage::Render) {
            return Err(BrowserError::Render(message));
        }

        let viewport = match (self.viewport, self.navigated) {
            (Some(viewport), true) => viewport,
            _ => return Err(BrowserError::Render("nothing loaded".to_string())),
        };

        let surface = capture_surface(viewport, self.script.document_height, full_page);
        if let Ok(mut surfaces) = self.recorder.surfaces.lock() {
            surfaces.push(surface);
        }

        Ok(fake_image(format, surface))
    }

    fn close(&mut self) -> Result<()> {
        if !self.mark_closed() {
            return Ok(());
        }
        self.recorder.closes.fetch_add(1, Ordering::SeqCst);
        self.recorder.live.fetch_sub(1, Ordering::SeqCst);

        match self.failure(MockStage::Close) {
            Some(message) => Err(BrowserError::Teardown(message)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
