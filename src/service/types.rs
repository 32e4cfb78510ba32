//! Shared types for the screenshot service.
//!
//! This module provides the framework-agnostic types that define the API
//! contract of the capture endpoint.
//!
//! # Overview
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`CaptureRequest`] | Fully validated capture parameters |
//! | [`Viewport`] | Rendering surface size in CSS pixels |
//! | [`WaitStrategy`] | Readiness condition for navigation completion |
//! | [`ImageFormat`] | Output encoding, derived from the file name |
//! | [`FileName`] | A bare file name that cannot escape the storage root |
//! | [`StoredScreenshot`] | Where a successful capture was written |
//! | [`CaptureError`] | Classified failure with HTTP status mapping |
//! | [`CaptureResult`] | JSON body returned to clients |
//! | [`HealthResponse`] | Health check response |
//!
//! # Wire Format
//!
//! Success:
//!
//! ```json
//! {
//!     "success": true,
//!     "message": "Screenshot captured successfully",
//!     "path": "/uploads/shot1.jpg"
//! }
//! ```
//!
//! Failure:
//!
//! ```json
//! {
//!     "success": false,
//!     "message": "Navigation failed: net::ERR_NAME_NOT_RESOLVED",
//!     "error": {
//!         "kind": "NavigationFailure",
//!         "code": "NAVIGATION_FAILED",
//!         "detail": "net::ERR_NAME_NOT_RESOLVED"
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use url::Url;

// ============================================================================
// Request Types
// ============================================================================

/// Rendering surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Surface width.
    pub width: u32,
    /// Surface height.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport of `width × height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    /// 1280 × 1024, the size the capture form starts with.
    fn default() -> Self {
        Self::new(1280, 1024)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Readiness condition that ends a navigation.
///
/// | Strategy | Wire value | Alias | Ready when |
/// |----------|------------|-------|------------|
/// | [`NetworkIdleStrict`](Self::NetworkIdleStrict) | `network-idle-strict` | `networkidle0` | 0 in-flight connections for 500ms |
/// | [`NetworkIdleLenient`](Self::NetworkIdleLenient) | `network-idle-lenient` | `networkidle2` | ≤ 2 in-flight connections for 500ms |
/// | [`DomContentLoaded`](Self::DomContentLoaded) | `dom-content-loaded` | `domcontentloaded` | document parsed |
/// | [`LoadComplete`](Self::LoadComplete) | `load-complete` | `load` | `load` event fired |
///
/// # Example
///
/// ```rust
/// use webshot_api::service::WaitStrategy;
///
/// let strategy: WaitStrategy = "networkidle2".parse().unwrap();
/// assert_eq!(strategy, WaitStrategy::NetworkIdleLenient);
/// assert_eq!(strategy.as_str(), "network-idle-lenient");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitStrategy {
    /// No in-flight connections for a sustained quiet window.
    #[default]
    NetworkIdleStrict,
    /// At most two in-flight connections for a sustained quiet window.
    NetworkIdleLenient,
    /// The document has been parsed; subresources may still be loading.
    DomContentLoaded,
    /// The `load` event has fired.
    LoadComplete,
}

impl WaitStrategy {
    /// All strategies, in wire-value order.
    pub const ALL: [WaitStrategy; 4] = [
        WaitStrategy::NetworkIdleStrict,
        WaitStrategy::NetworkIdleLenient,
        WaitStrategy::DomContentLoaded,
        WaitStrategy::LoadComplete,
    ];

    /// Canonical wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkIdleStrict => "network-idle-strict",
            Self::NetworkIdleLenient => "network-idle-lenient",
            Self::DomContentLoaded => "dom-content-loaded",
            Self::LoadComplete => "load-complete",
        }
    }

    /// Name of the Chrome page lifecycle event that satisfies this strategy.
    ///
    /// Chrome's `networkIdle` / `networkAlmostIdle` events implement the
    /// 0-connection and 2-connection quiet windows respectively.
    pub fn lifecycle_event(&self) -> &'static str {
        match self {
            Self::NetworkIdleStrict => "networkIdle",
            Self::NetworkIdleLenient => "networkAlmostIdle",
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::LoadComplete => "load",
        }
    }
}

impl fmt::Display for WaitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "network-idle-strict" | "networkidle0" => Ok(Self::NetworkIdleStrict),
            "network-idle-lenient" | "networkidle2" => Ok(Self::NetworkIdleLenient),
            "dom-content-loaded" | "domcontentloaded" => Ok(Self::DomContentLoaded),
            "load-complete" | "load" => Ok(Self::LoadComplete),
            other => Err(format!(
                "unknown wait strategy '{}', expected one of: {}",
                other,
                WaitStrategy::ALL.map(|s| s.as_str()).join(", ")
            )),
        }
    }
}

/// Image encoding of a stored screenshot.
///
/// Chosen from the extension of the requested file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless PNG.
    Png,
    /// JPEG at [`ImageFormat::DEFAULT_QUALITY`].
    Jpeg,
    /// WebP at [`ImageFormat::DEFAULT_QUALITY`].
    Webp,
}

impl ImageFormat {
    /// Encoder quality for lossy formats.
    pub const DEFAULT_QUALITY: u32 = 90;

    /// Detect the format from a file name's extension (case-insensitive).
    ///
    /// ```rust
    /// use webshot_api::service::ImageFormat;
    ///
    /// assert_eq!(ImageFormat::from_file_name("shot.JPG"), Some(ImageFormat::Jpeg));
    /// assert_eq!(ImageFormat::from_file_name("shot.gif"), None);
    /// assert_eq!(ImageFormat::from_file_name("shot"), None);
    /// ```
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// MIME type of the encoded image.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Encoder quality, `None` for lossless formats.
    pub fn quality(&self) -> Option<u32> {
        match self {
            Self::Png => None,
            Self::Jpeg | Self::Webp => Some(Self::DEFAULT_QUALITY),
        }
    }
}

/// A bare file name, safe to join onto the storage root.
///
/// Only the request validator can construct one, so holding a `FileName`
/// proves the value contains no path separator, is not `.` or `..`, and
/// carries a supported image extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FileName(String);

impl FileName {
    pub(in crate::service) fn from_validated(name: String) -> Self {
        Self(name)
    }

    /// The file name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A capture request that passed validation.
///
/// Produced by [`validate_payload`](crate::service::validate_payload) and
/// [`validate_value`](crate::service::validate_value); immutable afterwards.
#[derive(Debug, Clone)]
pub struct CaptureRequest {
    /// Absolute `http`/`https` URL of the page to capture.
    pub target_url: Url,
    /// Rendering surface size.
    pub viewport: Viewport,
    /// Extend the capture to the full document height.
    pub full_page: bool,
    /// Readiness condition for navigation.
    pub wait_strategy: WaitStrategy,
    /// Name of the stored artifact.
    pub file_name: FileName,
    /// Encoding derived from `file_name`.
    pub format: ImageFormat,
}

// ============================================================================
// Response Types
// ============================================================================

/// A screenshot persisted to the storage root.
#[derive(Debug, Clone)]
pub struct StoredScreenshot {
    /// Public URL path, e.g. `/uploads/shot1.jpg`.
    pub public_path: String,
    /// Location on disk.
    pub file_path: PathBuf,
    /// Number of bytes written.
    pub size: usize,
    /// Encoding of the stored image.
    pub format: ImageFormat,
}

/// JSON body returned by the capture endpoint.
///
/// Exactly one of `path` (on success) or `error` (on failure) is present.
///
/// # Examples
///
/// ```rust
/// use webshot_api::service::{CaptureError, CaptureResult};
///
/// let result = CaptureResult::from(&CaptureError::Navigation("unreachable".to_string()));
/// assert!(!result.success);
/// assert_eq!(result.error.unwrap().code, "NAVIGATION_FAILED");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResult {
    /// Whether the screenshot was stored.
    pub success: bool,

    /// Human-readable outcome.
    pub message: String,

    /// Public path of the stored artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Failure descriptor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDescriptor>,
}

impl CaptureResult {
    /// Message sent with every successful capture.
    pub const SUCCESS_MESSAGE: &'static str = "Screenshot captured successfully";
}

impl From<&StoredScreenshot> for CaptureResult {
    fn from(stored: &StoredScreenshot) -> Self {
        Self {
            success: true,
            message: Self::SUCCESS_MESSAGE.to_string(),
            path: Some(stored.public_path.clone()),
            error: None,
        }
    }
}

impl From<&CaptureError> for CaptureResult {
    fn from(err: &CaptureError) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            path: None,
            error: Some(ErrorDescriptor::from(err)),
        }
    }
}

impl From<&Result<StoredScreenshot, CaptureError>> for CaptureResult {
    fn from(outcome: &Result<StoredScreenshot, CaptureError>) -> Self {
        match outcome {
            Ok(stored) => Self::from(stored),
            Err(err) => Self::from(err),
        }
    }
}

/// Machine-readable part of a failed [`CaptureResult`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    /// Failure class.
    pub kind: FailureKind,

    /// Stable, uppercase error code. See [`CaptureError::error_code`].
    pub code: String,

    /// Underlying cause.
    pub detail: String,

    /// Offending request field, for validation failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&CaptureError> for ErrorDescriptor {
    fn from(err: &CaptureError) -> Self {
        Self {
            kind: err.kind(),
            code: err.error_code().to_string(),
            detail: err.detail().to_string(),
            field: err.field().map(str::to_string),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the server answers.
    pub status: String,

    /// Service name.
    pub service: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "webshot-api".to_string(),
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Failure classes surfaced to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Malformed or unsafe input; no browser was launched.
    #[serde(rename = "ValidationFailure")]
    Validation,
    /// The browser instance could not be started.
    #[serde(rename = "LaunchFailure")]
    Launch,
    /// The page or its viewport could not be set up.
    #[serde(rename = "ConfigurationFailure")]
    Configuration,
    /// The target could not be loaded, including timeouts.
    #[serde(rename = "NavigationFailure")]
    Navigation,
    /// The loaded page could not be rendered.
    #[serde(rename = "RenderFailure")]
    Render,
    /// The rendered image could not be written.
    #[serde(rename = "StorageFailure")]
    Storage,
    /// Anything else (operation timeout, worker crash).
    #[serde(rename = "InternalFailure")]
    Internal,
}

/// Errors that end a capture request.
///
/// Every request ends in exactly one of these or in a stored screenshot.
///
/// # HTTP Status Mapping
///
/// | Variant | Status | Code |
/// |---------|--------|------|
/// | `Validation` | 400 | `VALIDATION_FAILED` |
/// | `Launch` | 503 | `LAUNCH_FAILED` |
/// | `Configuration` | 500 | `CONFIGURATION_FAILED` |
/// | `Navigation` | 502 | `NAVIGATION_FAILED` |
/// | `NavigationTimeout` | 504 | `NAVIGATION_TIMEOUT` |
/// | `Render` | 502 | `RENDER_FAILED` |
/// | `Storage` | 500 | `STORAGE_FAILED` |
/// | `Timeout` | 504 | `OPERATION_TIMEOUT` |
/// | `Internal` | 500 | `INTERNAL_ERROR` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// A request field is missing, malformed or unsafe.
    Validation {
        /// Wire name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The browser instance could not be launched.
    Launch(String),

    /// Opening the page or setting its viewport failed.
    Configuration(String),

    /// Transport-level navigation failure.
    Navigation(String),

    /// The readiness condition was not met before the navigation timeout.
    NavigationTimeout(String),

    /// Rendering the page to an image failed.
    Render(String),

    /// Writing the image to the storage root failed.
    Storage(String),

    /// The whole operation exceeded the operation timeout.
    Timeout(String),

    /// Unexpected failure outside the pipeline stages.
    Internal(String),
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { field, reason } => write!(f, "Invalid {}: {}", field, reason),
            Self::Launch(msg) => write!(f, "Failed to launch browser: {}", msg),
            Self::Configuration(msg) => write!(f, "Failed to configure page: {}", msg),
            Self::Navigation(msg) => write!(f, "Navigation failed: {}", msg),
            Self::NavigationTimeout(msg) => write!(f, "Navigation timed out: {}", msg),
            Self::Render(msg) => write!(f, "Failed to render screenshot: {}", msg),
            Self::Storage(msg) => write!(f, "Failed to store screenshot: {}", msg),
            Self::Timeout(msg) => write!(f, "Operation timeout: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for CaptureError {}

impl CaptureError {
    /// Shorthand for a validation failure on `field`.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Failure class of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation { .. } => FailureKind::Validation,
            Self::Launch(_) => FailureKind::Launch,
            Self::Configuration(_) => FailureKind::Configuration,
            Self::Navigation(_) | Self::NavigationTimeout(_) => FailureKind::Navigation,
            Self::Render(_) => FailureKind::Render,
            Self::Storage(_) => FailureKind::Storage,
            Self::Timeout(_) | Self::Internal(_) => FailureKind::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    ///
    /// ```rust
    /// use webshot_api::service::CaptureError;
    ///
    /// assert_eq!(CaptureError::validation("url", "missing scheme").status_code(), 400);
    /// assert_eq!(CaptureError::Launch("no chrome".to_string()).status_code(), 503);
    /// assert_eq!(CaptureError::NavigationTimeout("30s".to_string()).status_code(), 504);
    /// ```
    pub fn status_code(&self) -> u16 {
        match self {
            // Client errors (4xx)
            Self::Validation { .. } => 400,

            // Server errors (5xx)
            Self::Configuration(_) | Self::Storage(_) | Self::Internal(_) => 500,

            // Bad gateway (upstream page problems)
            Self::Navigation(_) | Self::Render(_) => 502,

            // Service unavailable
            Self::Launch(_) => 503,

            // Gateway timeout
            Self::NavigationTimeout(_) | Self::Timeout(_) => 504,
        }
    }

    /// Returns a stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_FAILED",
            Self::Launch(_) => "LAUNCH_FAILED",
            Self::Configuration(_) => "CONFIGURATION_FAILED",
            Self::Navigation(_) => "NAVIGATION_FAILED",
            Self::NavigationTimeout(_) => "NAVIGATION_TIMEOUT",
            Self::Render(_) => "RENDER_FAILED",
            Self::Storage(_) => "STORAGE_FAILED",
            Self::Timeout(_) => "OPERATION_TIMEOUT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns `true` if a caller may reasonably retry the same request.
    ///
    /// The service itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Launch(_)
            | Self::Navigation(_)
            | Self::NavigationTimeout(_)
            | Self::Render(_)
            | Self::Timeout(_) => true,

            // Client must fix the request
            Self::Validation { .. } => false,

            Self::Configuration(_) | Self::Storage(_) | Self::Internal(_) => false,
        }
    }

    /// Underlying cause without the class prefix.
    pub fn detail(&self) -> &str {
        match self {
            Self::Validation { reason, .. } => reason,
            Self::Launch(msg)
            | Self::Configuration(msg)
            | Self::Navigation(msg)
            | Self::NavigationTimeout(msg)
            | Self::Render(msg)
            | Self::Storage(msg)
            | Self::Timeout(msg)
            | Self::Internal(msg) => msg,
        }
    }

    /// Offending field for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_strategy_parses_wire_values_and_aliases() {
        for strategy in WaitStrategy::ALL {
            assert_eq!(strategy.as_str().parse::<WaitStrategy>(), Ok(strategy));
        }

        assert_eq!("networkidle0".parse(), Ok(WaitStrategy::NetworkIdleStrict));
        assert_eq!("networkidle2".parse(), Ok(WaitStrategy::NetworkIdleLenient));
        assert_eq!("domcontentloaded".parse(), Ok(WaitStrategy::DomContentLoaded));
        assert_eq!("load".parse(), Ok(WaitStrategy::LoadComplete));
    }

    #[test]
    fn test_wait_strategy_default_is_strictest() {
        assert_eq!(WaitStrategy::default(), WaitStrategy::NetworkIdleStrict);
    }

    #[test]
    fn test_wait_strategy_rejects_unknown() {
        let err = "whenever".parse::<WaitStrategy>().unwrap_err();
        assert!(err.contains("whenever"));
        assert!(err.contains("load-complete"));
    }

    #[test]
    fn test_wait_strategy_lifecycle_events() {
        assert_eq!(WaitStrategy::NetworkIdleStrict.lifecycle_event(), "networkIdle");
        assert_eq!(
            WaitStrategy::NetworkIdleLenient.lifecycle_event(),
            "networkAlmostIdle"
        );
        assert_eq!(
            WaitStrategy::DomContentLoaded.lifecycle_event(),
            "DOMContentLoaded"
        );
        assert_eq!(WaitStrategy::LoadComplete.lifecycle_event(), "load");
    }

    #[test]
    fn test_wait_strategy_serde_uses_kebab_case() {
        let json = serde_json::to_string(&WaitStrategy::DomContentLoaded).unwrap();
        assert_eq!(json, "\"dom-content-loaded\"");
    }

    #[test]
    fn test_image_format_detection() {
        assert_eq!(ImageFormat::from_file_name("a.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_file_name("a.jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("a.tar.webp"), Some(ImageFormat::Webp));
        assert_eq!(ImageFormat::from_file_name("a.pdf"), None);
        assert_eq!(ImageFormat::from_file_name("png"), None);
    }

    #[test]
    fn test_image_format_quality() {
        assert_eq!(ImageFormat::Png.quality(), None);
        assert_eq!(ImageFormat::Jpeg.quality(), Some(ImageFormat::DEFAULT_QUALITY));
        assert_eq!(ImageFormat::Jpeg.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(CaptureError::validation("url", "").status_code(), 400);
        assert_eq!(CaptureError::Launch("".into()).status_code(), 503);
        assert_eq!(CaptureError::Configuration("".into()).status_code(), 500);
        assert_eq!(CaptureError::Navigation("".into()).status_code(), 502);
        assert_eq!(CaptureError::NavigationTimeout("".into()).status_code(), 504);
        assert_eq!(CaptureError::Render("".into()).status_code(), 502);
        assert_eq!(CaptureError::Storage("".into()).status_code(), 500);
        assert_eq!(CaptureError::Timeout("".into()).status_code(), 504);
        assert_eq!(CaptureError::Internal("".into()).status_code(), 500);
    }

    #[test]
    fn test_navigation_timeout_is_a_navigation_failure() {
        let err = CaptureError::NavigationTimeout("30s elapsed".into());
        assert_eq!(err.kind(), FailureKind::Navigation);
        assert_eq!(err.error_code(), "NAVIGATION_TIMEOUT");
    }

    #[test]
    fn test_error_retryable() {
        assert!(CaptureError::Launch("".into()).is_retryable());
        assert!(CaptureError::NavigationTimeout("".into()).is_retryable());
        assert!(!CaptureError::validation("fileName", "").is_retryable());
        assert!(!CaptureError::Storage("".into()).is_retryable());
    }

    #[test]
    fn test_failure_result_body() {
        let err = CaptureError::validation("fileName", "must not contain '..'");
        let body = serde_json::to_value(CaptureResult::from(&err)).unwrap();

        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid fileName: must not contain '..'");
        assert_eq!(body["error"]["kind"], "ValidationFailure");
        assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
        assert_eq!(body["error"]["field"], "fileName");
        assert!(body.get("path").is_none());
    }

    #[test]
    fn test_success_result_body() {
        let stored = StoredScreenshot {
            public_path: "/uploads/shot1.jpg".to_string(),
            file_path: PathBuf::from("public/uploads/shot1.jpg"),
            size: 42,
            format: ImageFormat::Jpeg,
        };
        let body = serde_json::to_value(CaptureResult::from(&stored)).unwrap();

        assert_eq!(body["success"], true);
        assert_eq!(body["message"], CaptureResult::SUCCESS_MESSAGE);
        assert_eq!(body["path"], "/uploads/shot1.jpg");
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_health_response_default() {
        let response = HealthResponse::default();
        assert_eq!(response.status, "healthy");
        assert_eq!(response.service, "webshot-api");
    }
}
