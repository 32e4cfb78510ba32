//! Error types for browser sessions.
//!
//! This module provides [`BrowserError`], the error type returned by the
//! browser-automation layer ([`BrowserFactory`](crate::BrowserFactory) and
//! [`BrowserSession`](crate::BrowserSession)), and a convenient [`Result`]
//! type alias.
//!
//! The capture pipeline never hands these errors to clients directly. It
//! classifies them by the stage they happened in and converts them into a
//! [`CaptureError`](crate::service::CaptureError).
//!
//! # Example
//!
//! ```rust
//! use webshot_api::{BrowserError, Result};
//!
//! fn launch() -> Result<()> {
//!     Err(BrowserError::Launch("chrome binary not found".to_string()))
//! }
//!
//! match launch() {
//!     Ok(()) => println!("launched"),
//!     Err(BrowserError::Launch(msg)) => eprintln!("launch failed: {}", msg),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! ```

/// Errors raised by the browser-automation layer.
///
/// Each variant corresponds to one capability of a browser session. The
/// message carries the underlying engine's description of the failure.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// Failed to start a browser instance.
    ///
    /// # Common Causes
    ///
    /// - Chrome/Chromium binary not found or not installed
    /// - Insufficient permissions to execute Chrome
    /// - System resource limits exceeded (e.g., too many processes)
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// Invalid launch or session configuration.
    ///
    /// Raised before any process is started, e.g. when launch options
    /// cannot be built.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to open a page or size its rendering surface.
    #[error("Page setup failed: {0}")]
    Page(String),

    /// Transport-level navigation failure (DNS, TLS, connection refused).
    ///
    /// HTTP error statuses are not navigation failures: a 404 page is still
    /// a page and gets rendered.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// The readiness condition was not reached within the navigation timeout.
    #[error("Navigation timed out: {0}")]
    NavigationTimeout(String),

    /// Failed to render the current page to an image.
    #[error("Render failed: {0}")]
    Render(String),

    /// Failed to release the browser instance.
    ///
    /// Only ever logged. Teardown failures never replace the outcome of the
    /// capture that owned the session.
    #[error("Teardown failed: {0}")]
    Teardown(String),
}

/// Convenience conversion from [`String`] to [`BrowserError::Configuration`].
impl From<String> for BrowserError {
    fn from(msg: String) -> Self {
        BrowserError::Configuration(msg)
    }
}

/// Convenience conversion from `&str` to [`BrowserError::Configuration`].
impl From<&str> for BrowserError {
    fn from(msg: &str) -> Self {
        BrowserError::Configuration(msg.to_string())
    }
}

/// Result type alias using [`BrowserError`].
pub type Result<T> = std::result::Result<T, BrowserError>;

// ============================================================================
// Unit Tests
// ============================================================================
