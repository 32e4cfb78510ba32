//! Convenient imports for common usage patterns.
//!
//! ```rust,ignore
//! use webshot_api::prelude::*;
//! ```
//!
//! This imports:
//!
//! - [`CaptureConfig`] / [`CaptureConfigBuilder`] - Configuration
//! - [`ViewportLimits`] - Accepted viewport sizes
//! - [`BrowserError`] / [`Result`] - Engine-level errors
//! - [`BrowserFactory`] / [`ChromeBrowserFactory`] - Browser launching
//! - [`BrowserSession`] / [`SessionGuard`] - One capture's browser
//! - [`CapturePipeline`] - Runs validated requests
//! - [`CaptureRequest`], [`CaptureResult`], [`CaptureError`] - Service contract
//! - [`WaitStrategy`], [`Viewport`], [`ImageFormat`] - Request vocabulary
//! - [`ScreenshotStore`] - Storage root
//! - [`CaptureStats`] - Counter snapshot

// Core types
pub use crate::config::{CaptureConfig, CaptureConfigBuilder, ViewportLimits};
pub use crate::error::{BrowserError, Result};
pub use crate::factory::{BrowserFactory, ChromeBrowserFactory};
pub use crate::service::{
    CaptureError, CapturePipeline, CaptureRequest, CaptureResult, ImageFormat, Viewport,
    WaitStrategy,
};
pub use crate::session::{BrowserSession, SessionGuard};
pub use crate::stats::CaptureStats;
pub use crate::storage::ScreenshotStore;

// Feature-gated exports
#[cfg(feature = "env-config")]
pub use crate::config::env::{chrome_path_from_env, from_env};

// Re-export Arc for convenience (factories are shared as Arc<dyn BrowserFactory>)
pub use std::sync::Arc;
