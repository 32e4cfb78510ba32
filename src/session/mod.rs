//! Browser sessions and their teardown guard.
//!
//! A [`BrowserSession`] is one launched browser process with one page in it,
//! owned by exactly one capture. [`SessionGuard`] wraps a session so that it
//! is torn down exactly once, whichever way the capture ends.
//!
//! # Lifecycle
//!
//! ```text
//! BrowserFactory::launch()
//!       │
//!       ▼
//! SessionGuard::new()  ──→  open_page ──→ navigate ──→ render
//!       │                        │            │           │
//!       │         (any failure) ─┴────────────┴───────────┘
//!       ▼
//! SessionGuard::teardown()   (or Drop, if the capture unwinds)
//! ```

mod chrome;

pub use chrome::ChromeSession;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::{Duration, Instant};

use url::Url;

use crate::error::{BrowserError, Result};
use crate::service::{ImageFormat, Viewport, WaitStrategy};
use crate::stats::CaptureCounters;

/// Tallest surface a full-page capture will render, in CSS pixels.
///
/// Chrome refuses to composite much beyond this, and pages with effectively
/// infinite scroll would otherwise produce unbounded images.
pub const MAX_CAPTURE_HEIGHT: u32 = 16_384;

/// Allocate a process-unique session id for log correlation.
pub(crate) fn next_session_id() -> u64 {
    static NEXT_ID: AtomicU64 = AtomicU64::new(1);
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Run a blocking navigation call on a helper thread and wait at most `timeout`.
///
/// If the deadline passes, the call is left running and
/// [`BrowserError::NavigationTimeout`] is returned. The helper thread ends
/// once the call returns, which tearing down the session forces.
///
/// ```rust
/// use std::time::Duration;
/// use webshot_api::BrowserError;
/// use webshot_api::session::call_with_deadline;
///
/// let fast = call_with_deadline(Duration::from_secs(1), "navigate", || Ok(7));
/// assert_eq!(fast.unwrap(), 7);
///
/// let slow = call_with_deadline(Duration::from_millis(20), "navigate", || {
///     std::thread::sleep(Duration::from_millis(500));
///     Ok(())
/// });
/// assert!(matches!(slow, Err(BrowserError::NavigationTimeout(_))));
/// ```
pub fn call_with_deadline<T, F>(timeout: Duration, what: &str, call: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    std::thread::Builder::new()
        .name(format!("webshot-{}", what))
        .spawn(move || {
            // The receiver is gone if the deadline already passed.
            let _ = tx.send(call());
        })
        .map_err(|e| BrowserError::Navigation(format!("failed to start {}: {}", what, e)))?;

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(RecvTimeoutError::Timeout) => Err(BrowserError::NavigationTimeout(format!(
            "{} did not return within {:?}",
            what, timeout
        ))),
        Err(RecvTimeoutError::Disconnected) => Err(BrowserError::Navigation(format!(
            "{} ended without a result",
            what
        ))),
    }
}

/// One launched browser instance and its single page.
///
/// Implementations are driven strictly in order: [`open_page`](Self::open_page),
/// [`navigate`](Self::navigate), [`render`](Self::render), and finally
/// [`close`](Self::close), which may be reached from any earlier step.
///
/// Sessions are `Send` so a capture can run on a blocking worker thread,
/// but never shared: every capture owns its session exclusively.
pub trait BrowserSession: Send {
    /// Process-unique id, used in logs.
    fn id(&self) -> u64;

    /// Open a page and size its rendering surface to `viewport`.
    ///
    /// # Errors
    ///
    /// [`BrowserError::Page`] if the page cannot be created or sized.
    fn open_page(&mut self, viewport: Viewport) -> Result<()>;

    /// Load `url` and block until `wait` is satisfied.
    ///
    /// HTTP error statuses are not failures; only transport-level problems are.
    ///
    /// # Errors
    ///
    /// - [`BrowserError::Navigation`] for DNS, TLS or connection failures
    /// - [`BrowserError::NavigationTimeout`] if `wait` is not reached within `timeout`
    fn navigate(&mut self, url: &Url, wait: WaitStrategy, timeout: Duration) -> Result<()>;

    /// Render the loaded page.
    ///
    /// With `full_page`, the surface is extended to the document height
    /// first (see [`capture_surface`]).
    ///
    /// # Errors
    ///
    /// [`BrowserError::Render`] if the image cannot be produced.
    fn render(&mut self, format: ImageFormat, full_page: bool) -> Result<Vec<u8>>;

    /// Release the page and terminate the browser process.
    ///
    /// Must be safe to call more than once; calls after the first are no-ops.
    ///
    /// # Errors
    ///
    /// [`BrowserError::Teardown`] if releasing reported a problem. The
    /// process is still gone afterwards.
    fn close(&mut self) -> Result<()>;
}

/// Size of the surface to render.
///
/// Without `full_page` this is the viewport. With it, the height grows to the
/// document height (never shrinking below the viewport height), capped at
/// [`MAX_CAPTURE_HEIGHT`] unless the viewport itself is taller.
///
/// ```rust
/// use webshot_api::service::Viewport;
/// use webshot_api::session::capture_surface;
///
/// let viewport = Viewport::new(1280, 1024);
/// assert_eq!(capture_surface(viewport, 5000, false), viewport);
/// assert_eq!(capture_surface(viewport, 5000, true), Viewport::new(1280, 5000));
/// assert_eq!(capture_surface(viewport, 600, true), viewport);
/// ```
pub fn capture_surface(viewport: Viewport, document_height: u32, full_page: bool) -> Viewport {
    if !full_page {
        return viewport;
    }

    let cap = MAX_CAPTURE_HEIGHT.max(viewport.height);
    let height = document_height.max(viewport.height).min(cap);
    Viewport::new(viewport.width, height)
}

/// RAII guard that tears down a [`BrowserSession`] exactly once.
///
/// The pipeline calls [`teardown`](Self::teardown) explicitly on every path.
/// If the guard is dropped without that (a panic unwinding through a stage),
/// `Drop` performs the teardown instead.
///
/// Teardown errors are logged as warnings and counted, never returned: they
/// must not replace the outcome of the capture that owned the session.
///
/// # Thread Safety
///
/// `SessionGuard` is `Send` but not `Sync`, matching the one-capture,
/// one-session ownership model.
pub struct SessionGuard {
    /// The session (Option allows taking in teardown/Drop).
    session: Option<Box<dyn BrowserSession>>,

    counters: CaptureCounters,

    launched_at: Instant,
}

impl SessionGuard {
    /// Take ownership of a freshly launched session.
    pub fn new(session: Box<dyn BrowserSession>, counters: CaptureCounters) -> Self {
        counters.session_launched();
        log::debug!("🚀 Session {} launched", session.id());

        Self {
            session: Some(session),
            counters,
            launched_at: Instant::now(),
        }
    }

    /// Id of the guarded session, `0` once torn down.
    pub fn id(&self) -> u64 {
        self.session.as_ref().map(|s| s.id()).unwrap_or(0)
    }

    fn live(&mut self) -> Result<&mut (dyn BrowserSession + 'static)> {
        self.session
            .as_deref_mut()
            .ok_or_else(|| BrowserError::Teardown("session already torn down".to_string()))
    }

    /// See [`BrowserSession::open_page`].
    pub fn open_page(&mut self, viewport: Viewport) -> Result<()> {
        self.live()?.open_page(viewport)
    }

    /// See [`BrowserSession::navigate`].
    pub fn navigate(&mut self, url: &Url, wait: WaitStrategy, timeout: Duration) -> Result<()> {
        self.live()?.navigate(url, wait, timeout)
    }

    /// See [`BrowserSession::render`].
    pub fn render(&mut self, format: ImageFormat, full_page: bool) -> Result<Vec<u8>> {
        self.live()?.render(format, full_page)
    }

    /// Tear down the session.
    ///
    /// Consumes the guard, so a session can only be torn down once.
    pub fn teardown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            let id = session.id();
            log::debug!("🧹 Tearing down session {} (age {:?})", id, self.launched_at.elapsed());

            let outcome = session.close();
            self.counters.session_torn_down();

            match outcome {
                Ok(()) => log::debug!("✅ Session {} torn down", id),
                Err(e) => {
                    self.counters.teardown_warning();
                    log::warn!("⚠️ Teardown warning for session {}: {}", id, e);
                }
            }
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.session.is_some() {
            log::warn!(
                "⚠️ Session {} dropped without explicit teardown, releasing now",
                self.id()
            );
            self.release();
        }
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.session {
            Some(session) => f
                .debug_struct("SessionGuard")
                .field("id", &session.id())
                .field("age", &self.launched_at.elapsed())
                .finish(),
            None => f
                .debug_struct("SessionGuard")
                .field("state", &"torn down")
                .finish(),
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    struct CountingSession {
        id: u64,
        closes: Arc<AtomicUsize>,
        close_error: bool,
    }

    impl BrowserSession for CountingSession {
        fn id(&self) -> u64 {
            self.id
        }

        fn open_page(&mut self, _viewport: Viewport) -> Result<()> {
            Ok(())
        }

        fn navigate(&mut self, _url: &Url, _wait: WaitStrategy, _timeout: Duration) -> Result<()> {
            Ok(())
        }

        fn render(&mut self, _format: ImageFormat, _full_page: bool) -> Result<Vec<u8>> {
            Ok(vec![1, 2, 3])
        }

        fn close(&mut self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            if self.close_error {
                Err(BrowserError::Teardown("process already exited".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn guard(close_error: bool) -> (SessionGuard, Arc<AtomicUsize>, CaptureCounters) {
        let closes = Arc::new(AtomicUsize::new(0));
        let counters = CaptureCounters::new();
        let session = CountingSession {
            id: next_session_id(),
            closes: Arc::clone(&closes),
            close_error,
        };
        (SessionGuard::new(Box::new(session), counters.clone()), closes, counters)
    }

    #[test]
    fn test_explicit_teardown_closes_once() {
        let (guard, closes, counters) = guard(false);
        guard.teardown();

        assert_eq!(closes.load(Ordering::SeqCst), 1);
        let stats = counters.snapshot();
        assert_eq!(stats.sessions_launched, 1);
        assert_eq!(stats.sessions_torn_down, 1);
        assert_eq!(stats.teardown_warnings, 0);
    }

    #[test]
    fn test_drop_tears_down() {
        let (guard, closes, counters) = guard(false);
        drop(guard);

        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(counters.snapshot().is_idle());
    }

    #[test]
    fn test_teardown_error_is_only_counted() {
        let (guard, closes, counters) = guard(true);
        guard.teardown();

        assert_eq!(closes.load(Ordering::SeqCst), 1);
        let stats = counters.snapshot();
        assert_eq!(stats.sessions_torn_down, 1);
        assert_eq!(stats.teardown_warnings, 1);
    }

    #[test]
    fn test_teardown_during_unwind() {
        let (guard, closes, _counters) = guard(false);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = guard;
            panic!("render stage blew up");
        }));

        assert!(result.is_err());
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_delegates_stages() {
        let (mut guard, _, _) = guard(false);
        let url = Url::parse("https://example.com").unwrap();

        guard.open_page(Viewport::default()).unwrap();
        guard
            .navigate(&url, WaitStrategy::LoadComplete, Duration::from_secs(1))
            .unwrap();
        assert_eq!(guard.render(ImageFormat::Png, false).unwrap(), vec![1, 2, 3]);
        assert!(guard.id() > 0);
        guard.teardown();
    }

    #[test]
    fn test_call_with_deadline_passes_result_through() {
        let value = call_with_deadline(Duration::from_secs(1), "navigate", || Ok("ready")).unwrap();
        assert_eq!(value, "ready");

        let err = call_with_deadline::<(), _>(Duration::from_secs(1), "navigate", || {
            Err(BrowserError::Navigation("net::ERR_CONNECTION_REFUSED".to_string()))
        })
        .unwrap_err();
        assert!(matches!(err, BrowserError::Navigation(ref m) if m.contains("REFUSED")));
    }

    #[test]
    fn test_call_with_deadline_bounds_blocking_call() {
        let started = Instant::now();
        let err = call_with_deadline(Duration::from_millis(50), "navigate", || {
            std::thread::sleep(Duration::from_secs(2));
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(err, BrowserError::NavigationTimeout(_)));
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_call_with_deadline_reports_panicked_call() {
        let err = call_with_deadline::<(), _>(Duration::from_secs(1), "navigate", || {
            panic!("transport thread died")
        })
        .unwrap_err();
        assert!(matches!(err, BrowserError::Navigation(_)));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = next_session_id();
        let b = next_session_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_capture_surface_caps_height() {
        let viewport = Viewport::new(1280, 1024);
        assert_eq!(
            capture_surface(viewport, 1_000_000, true),
            Viewport::new(1280, MAX_CAPTURE_HEIGHT)
        );

        let tall = Viewport::new(800, 20_000);
        assert_eq!(capture_surface(tall, 1_000_000, true), tall);
    }

    #[test]
    fn test_capture_surface_full_page_never_shrinks() {
        let viewport = Viewport::new(1280, 1024);
        for document_height in [0, 1, 1023, 1024, 1025, 4096] {
            let surface = capture_surface(viewport, document_height, true);
            assert!(surface.height >= viewport.height);
            assert_eq!(surface.width, viewport.width);
        }
    }
}
