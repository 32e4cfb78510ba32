//! Capture pipeline (framework-agnostic).
//!
//! [`CapturePipeline::run`] drives one validated [`CaptureRequest`] through
//! a fresh browser session:
//!
//! ```text
//! Idle ──▶ Launching ──▶ Configuring ──▶ Navigating ──▶ Capturing ──▶ Persisting
//!              │              │               │              │             │
//!              │              └───────────────┴──────┬───────┴─────────────┘
//!              │                                     ▼
//!              │                               TearingDown ──▶ Done
//!              ▼
//!            Done (launch failed, nothing to tear down)
//! ```
//!
//! Every request that gets past launching is torn down exactly once, on
//! success and on every failure. A teardown problem is logged and counted
//! but never replaces the outcome.
//!
//! # Blocking Behavior
//!
//! **These functions block the calling thread** for as long as the browser
//! needs (up to the navigation timeout plus render time). In an async
//! context, always wrap calls in a blocking task:
//!
//! ```rust,ignore
//! let outcome = tokio::task::spawn_blocking(move || pipeline.run(&request)).await?;
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::types::{CaptureError, CaptureRequest, StoredScreenshot};
use super::{truncate_url, validate_payload};
use crate::config::{CaptureConfig, ViewportLimits};
use crate::error::BrowserError;
use crate::factory::BrowserFactory;
use crate::session::SessionGuard;
use crate::stats::{CaptureCounters, CaptureStats};
use crate::storage::ScreenshotStore;

/// Stages of the capture state machine, used in logs and error mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Starting an isolated browser instance.
    Launching,
    /// Opening the page and sizing its viewport.
    Configuring,
    /// Loading the target until the readiness condition holds.
    Navigating,
    /// Rendering the page to an image.
    Capturing,
    /// Writing the image to the storage root.
    Persisting,
    /// Releasing the browser instance.
    TearingDown,
}

impl PipelineStage {
    /// Convert an engine error raised during this stage into the failure
    /// class reported to the client.
    pub fn classify(self, err: BrowserError) -> CaptureError {
        let timed_out = matches!(err, BrowserError::NavigationTimeout(_));
        let message = match err {
            BrowserError::Launch(msg)
            | BrowserError::Configuration(msg)
            | BrowserError::Page(msg)
            | BrowserError::Navigation(msg)
            | BrowserError::NavigationTimeout(msg)
            | BrowserError::Render(msg)
            | BrowserError::Teardown(msg) => msg,
        };

        match self {
            Self::Launching => CaptureError::Launch(message),
            Self::Configuring => CaptureError::Configuration(message),
            Self::Navigating if timed_out => CaptureError::NavigationTimeout(message),
            Self::Navigating => CaptureError::Navigation(message),
            Self::Capturing => CaptureError::Render(message),
            Self::Persisting => CaptureError::Storage(message),
            Self::TearingDown => CaptureError::Internal(message),
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Launching => "launching",
            Self::Configuring => "configuring",
            Self::Navigating => "navigating",
            Self::Capturing => "capturing",
            Self::Persisting => "persisting",
            Self::TearingDown => "tearing down",
        };
        f.write_str(name)
    }
}

/// Runs capture requests, one isolated browser session per request.
///
/// The pipeline holds no per-request state; it is cheap to clone and safe to
/// share between threads. Two identical requests launch two independent
/// sessions.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use std::time::Duration;
/// use webshot_api::{CapturePipeline, ChromeBrowserFactory, ScreenshotStore};
/// use webshot_api::service::validate_payload;
///
/// let pipeline = CapturePipeline::new(
///     Arc::new(ChromeBrowserFactory::with_defaults()),
///     ScreenshotStore::new("public/uploads", "/uploads"),
///     Duration::from_secs(30),
/// );
///
/// let request = validate_payload(body, None)?;
/// let stored = pipeline.run(&request)?;
/// println!("stored at {}", stored.public_path);
/// ```
#[derive(Clone)]
pub struct CapturePipeline {
    factory: Arc<dyn BrowserFactory>,
    store: ScreenshotStore,
    navigation_timeout: Duration,
    counters: CaptureCounters,
}

impl CapturePipeline {
    /// Create a pipeline with fresh counters.
    pub fn new(
        factory: Arc<dyn BrowserFactory>,
        store: ScreenshotStore,
        navigation_timeout: Duration,
    ) -> Self {
        Self {
            factory,
            store,
            navigation_timeout,
            counters: CaptureCounters::new(),
        }
    }

    /// Create a pipeline from the storage and timeout settings of `config`.
    pub fn from_config(factory: Arc<dyn BrowserFactory>, config: &CaptureConfig) -> Self {
        Self::new(
            factory,
            ScreenshotStore::from_config(config),
            config.navigation_timeout,
        )
    }

    /// Report into existing counters instead of fresh ones.
    pub fn with_counters(mut self, counters: CaptureCounters) -> Self {
        self.counters = counters;
        self
    }

    /// Counters this pipeline reports into.
    pub fn counters(&self) -> &CaptureCounters {
        &self.counters
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CaptureStats {
        self.counters.snapshot()
    }

    /// Storage root screenshots are written to.
    pub fn store(&self) -> &ScreenshotStore {
        &self.store
    }

    /// Limit for reaching the readiness condition.
    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    /// Capture one validated request.
    ///
    /// **Blocks the calling thread.**
    ///
    /// # Errors
    ///
    /// | Error | Stage |
    /// |-------|-------|
    /// | [`CaptureError::Launch`] | browser could not start |
    /// | [`CaptureError::Configuration`] | page or viewport setup failed |
    /// | [`CaptureError::Navigation`] | transport-level load failure |
    /// | [`CaptureError::NavigationTimeout`] | readiness not reached in time |
    /// | [`CaptureError::Render`] | screenshot failed |
    /// | [`CaptureError::Storage`] | file could not be written |
    pub fn run(&self, request: &CaptureRequest) -> Result<StoredScreenshot, CaptureError> {
        let started = Instant::now();
        let url = truncate_url(request.target_url.as_str(), 100);

        log::debug!(
            "📸 Capturing {} at {} (full_page={}, wait={}) -> {}",
            url,
            request.viewport,
            request.full_page,
            request.wait_strategy,
            request.file_name
        );

        log::trace!("Stage: {}", PipelineStage::Launching);
        let session = match self.factory.launch() {
            Ok(session) => session,
            Err(e) => {
                self.counters.launch_failed();
                self.counters.capture_failed();
                let err = PipelineStage::Launching.classify(e);
                log::error!("❌ Capture of {} failed while launching: {}", url, err);
                return Err(err);
            }
        };

        let mut guard = SessionGuard::new(session, self.counters.clone());
        let session_id = guard.id();

        let outcome = self.drive(&mut guard, request);

        log::trace!("Session {}: stage: {}", session_id, PipelineStage::TearingDown);
        guard.teardown();

        match &outcome {
            Ok(stored) => {
                self.counters.capture_succeeded();
                log::info!(
                    "✅ Screenshot of {} stored at {} ({} bytes, {:?})",
                    url,
                    stored.public_path,
                    stored.size,
                    started.elapsed()
                );
            }
            Err(e) => {
                self.counters.capture_failed();
                log::error!(
                    "❌ Capture of {} failed after {:?}: {}",
                    url,
                    started.elapsed(),
                    e
                );
            }
        }

        outcome
    }

    /// Run the stages between launch and teardown.
    fn drive(
        &self,
        guard: &mut SessionGuard,
        request: &CaptureRequest,
    ) -> Result<StoredScreenshot, CaptureError> {
        let id = guard.id();

        let stage = PipelineStage::Configuring;
        log::trace!("Session {}: stage: {}", id, stage);
        guard
            .open_page(request.viewport)
            .map_err(|e| stage.classify(e))?;

        let stage = PipelineStage::Navigating;
        log::trace!("Session {}: stage: {}", id, stage);
        let nav_start = Instant::now();
        guard
            .navigate(
                &request.target_url,
                request.wait_strategy,
                self.navigation_timeout,
            )
            .map_err(|e| stage.classify(e))?;
        log::debug!(
            "Session {}: {} reached in {:?}",
            id,
            request.wait_strategy,
            nav_start.elapsed()
        );

        let stage = PipelineStage::Capturing;
        log::trace!("Session {}: stage: {}", id, stage);
        let image = guard
            .render(request.format, request.full_page)
            .map_err(|e| stage.classify(e))?;
        log::debug!("Session {}: rendered {} bytes", id, image.len());

        let stage = PipelineStage::Persisting;
        log::trace!("Session {}: stage: {}", id, stage);
        self.store
            .persist(&request.file_name, request.format, &image)
            .map_err(|e| CaptureError::Storage(e.to_string()))
    }
}

impl fmt::Debug for CapturePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturePipeline")
            .field("store", &self.store)
            .field("navigation_timeout", &self.navigation_timeout)
            .field("stats", &self.counters.snapshot())
            .finish()
    }
}

impl CapturePipeline {
    /// Validate a raw request body without touching the browser.
    ///
    /// A rejected body is counted as a failed capture.
    pub fn prepare(
        &self,
        body: &[u8],
        limits: Option<&ViewportLimits>,
    ) -> Result<CaptureRequest, CaptureError> {
        validate_payload(body, limits).inspect_err(|e| {
            self.counters.capture_failed();
            log::debug!("Rejected capture request: {}", e);
        })
    }
}

/// Validate a raw request body and capture it.
///
/// Validation failures are counted as failed captures and never reach the
/// browser. **Blocks the calling thread.**
pub fn capture_from_payload(
    pipeline: &CapturePipeline,
    body: &[u8],
    limits: Option<&ViewportLimits>,
) -> Result<StoredScreenshot, CaptureError> {
    let request = pipeline.prepare(body, limits)?;
    pipeline.run(&request)
}

// ============================================================================
// Unit Tests
// ============================================================================
