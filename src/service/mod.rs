//! Screenshot capture service module.
//!
//! This module provides the **framework-agnostic core** of the capture
//! service: the request validator, the capture pipeline and the types that
//! make up the API contract. The HTTP layer in
//! [`integrations`](crate::integrations) is a thin adapter over it.
//!
//! # Module Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                      service module (this module)                    │
//! │                                                                      │
//! │  ┌────────────────────┐  ┌───────────────────┐  ┌─────────────────┐  │
//! │  │     types.rs       │  │    validate.rs    │  │   capture.rs    │  │
//! │  │  CaptureRequest    │  │  validate_payload │  │ CapturePipeline │  │
//! │  │  WaitStrategy      │  │  validate_value   │  │ PipelineStage   │  │
//! │  │  CaptureError      │  │  validate_url     │  │ capture_from_   │  │
//! │  │  CaptureResult     │  │  validate_file_   │  │   payload       │  │
//! │  │  HealthResponse    │  │    name           │  │                 │  │
//! │  └────────────────────┘  └───────────────────┘  └─────────────────┘  │
//! └──────────────────────────────────┬───────────────────────────────────┘
//!                                    │ used by
//!                                    ▼
//!                      integrations::axum (HTTP handlers)
//! ```
//!
//! # Design Philosophy
//!
//! | Layer | Responsibility | This Module? |
//! |-------|----------------|--------------|
//! | **Service** | Validation, browser lifecycle, storage | ✅ Yes |
//! | **Handler** | HTTP request/response mapping, timeouts | ❌ No (integrations) |
//!
//! # Blocking Behavior
//!
//! [`CapturePipeline::run`] and [`capture_from_payload`] block the calling
//! thread. Validation is fast and pure.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webshot_api::prelude::*;
//! use webshot_api::service::{capture_from_payload, CaptureResult};
//!
//! let config = CaptureConfig::default();
//! let pipeline = CapturePipeline::from_config(
//!     Arc::new(ChromeBrowserFactory::with_defaults()),
//!     &config,
//! );
//!
//! let outcome = capture_from_payload(&pipeline, body, config.viewport_limits.as_ref());
//! let response = CaptureResult::from(&outcome);
//! ```

mod capture;
mod types;
mod validate;

pub use types::CaptureError;
pub use types::CaptureRequest;
pub use types::CaptureResult;
pub use types::ErrorDescriptor;
pub use types::FailureKind;
pub use types::FileName;
pub use types::HealthResponse;
pub use types::ImageFormat;
pub use types::StoredScreenshot;
pub use types::Viewport;
pub use types::WaitStrategy;

pub use validate::MAX_FILE_NAME_LEN;
pub use validate::MAX_URL_LEN;
pub use validate::REQUIRED_FIELDS;
pub use validate::validate_file_name;
pub use validate::validate_payload;
pub use validate::validate_url;
pub use validate::validate_value;

pub use capture::CapturePipeline;
pub use capture::PipelineStage;
pub use capture::capture_from_payload;

/// Truncate a URL for logging purposes.
///
/// Keeps at most `max_chars` characters and appends `...` when anything was
/// cut.
///
/// ```rust
/// use webshot_api::service::truncate_url;
///
/// assert_eq!(truncate_url("https://example.com", 100), "https://example.com");
/// assert_eq!(truncate_url("https://example.com/long/path", 19), "https://example.com...");
/// ```
pub fn truncate_url(url: &str, max_chars: usize) -> String {
    match url.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &url[..cut]),
        None => url.to_string(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
