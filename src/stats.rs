//! Capture statistics for monitoring and health checks.
//!
//! This module provides [`CaptureCounters`], the shared counters the pipeline
//! updates as sessions come and go, and [`CaptureStats`], a point-in-time
//! snapshot of them.
//!
//! # Example
//!
//! ```rust
//! use webshot_api::CaptureCounters;
//!
//! let counters = CaptureCounters::new();
//! counters.session_launched();
//! counters.session_torn_down();
//! counters.capture_succeeded();
//!
//! let stats = counters.snapshot();
//! assert_eq!(stats.active_sessions(), 0);
//! assert_eq!(stats.captures_succeeded, 1);
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
struct Counters {
    sessions_launched: AtomicU64,
    sessions_torn_down: AtomicU64,
    launch_failures: AtomicU64,
    teardown_warnings: AtomicU64,
    captures_succeeded: AtomicU64,
    captures_failed: AtomicU64,
}

/// Shared, lock-free capture counters.
///
/// Cloning is cheap and every clone updates the same counters, so the
/// pipeline, its session guards and the HTTP layer can all hold one.
#[derive(Debug, Clone, Default)]
pub struct CaptureCounters {
    inner: Arc<Counters>,
}

impl CaptureCounters {
    /// Create a fresh set of counters, all zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful browser launch.
    pub fn session_launched(&self) {
        self.inner.sessions_launched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed browser launch.
    pub fn launch_failed(&self) {
        self.inner.launch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a teardown attempt, successful or not.
    pub fn session_torn_down(&self) {
        self.inner.sessions_torn_down.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a teardown that reported an error.
    pub fn teardown_warning(&self) {
        self.inner.teardown_warnings.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a stored screenshot.
    pub fn capture_succeeded(&self) {
        self.inner.captures_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a failed capture, including validation failures.
    pub fn capture_failed(&self) {
        self.inner.captures_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot of the current values.
    ///
    /// Counters are read individually, so a snapshot taken while captures
    /// are running may be momentarily inconsistent.
    pub fn snapshot(&self) -> CaptureStats {
        let c = &self.inner;
        CaptureStats {
            sessions_launched: c.sessions_launched.load(Ordering::Relaxed),
            sessions_torn_down: c.sessions_torn_down.load(Ordering::Relaxed),
            launch_failures: c.launch_failures.load(Ordering::Relaxed),
            teardown_warnings: c.teardown_warnings.load(Ordering::Relaxed),
            captures_succeeded: c.captures_succeeded.load(Ordering::Relaxed),
            captures_failed: c.captures_failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of capture statistics at a point in time.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `sessions_launched` | Browser instances started |
/// | `sessions_torn_down` | Teardown attempts |
/// | `launch_failures` | Launches that failed (no teardown needed) |
/// | `teardown_warnings` | Teardowns that reported an error |
/// | `captures_succeeded` | Screenshots stored |
/// | `captures_failed` | Requests that ended in a failure |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CaptureStats {
    /// Browser instances started.
    pub sessions_launched: u64,
    /// Teardown attempts.
    pub sessions_torn_down: u64,
    /// Launches that failed.
    pub launch_failures: u64,
    /// Teardowns that reported an error.
    pub teardown_warnings: u64,
    /// Screenshots stored.
    pub captures_succeeded: u64,
    /// Requests that ended in a failure.
    pub captures_failed: u64,
}

impl CaptureStats {
    /// Browser instances launched but not yet torn down.
    #[inline]
    pub fn active_sessions(&self) -> u64 {
        self.sessions_launched.saturating_sub(self.sessions_torn_down)
    }

    /// Returns `true` if no browser instance is currently alive.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.active_sessions() == 0
    }
}

impl std::fmt::Display for CaptureStats {
    /// Format stats for logging.
    ///
    /// ```rust
    /// use webshot_api::CaptureStats;
    ///
    /// let stats = CaptureStats {
    ///     sessions_launched: 3,
    ///     sessions_torn_down: 2,
    ///     captures_succeeded: 2,
    ///     ..Default::default()
    /// };
    ///
    /// assert_eq!(
    ///     stats.to_string(),
    ///     "CaptureStats { active: 1, launched: 3, succeeded: 2, failed: 0, teardown_warnings: 0 }"
    /// );
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CaptureStats {{ active: {}, launched: {}, succeeded: {}, failed: {}, teardown_warnings: {} }}",
            self.active_sessions(),
            self.sessions_launched,
            self.captures_succeeded,
            self.captures_failed,
            self.teardown_warnings
        )
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
