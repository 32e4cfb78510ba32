//! Configuration for the capture service.
//!
//! This module provides [`CaptureConfig`] and [`CaptureConfigBuilder`]
//! for configuring storage, timeouts, viewport limits and the server address.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use webshot_api::CaptureConfigBuilder;
//!
//! let config = CaptureConfigBuilder::new()
//!     .storage_dir("/var/lib/webshot/uploads")
//!     .navigation_timeout(Duration::from_secs(20))
//!     .max_concurrent_captures(4)
//!     .build()
//!     .expect("Invalid configuration");
//!
//! assert_eq!(config.navigation_timeout, Duration::from_secs(20));
//! assert_eq!(config.max_concurrent_captures, Some(4));
//! ```
//!
//! # Environment Configuration
//!
//! When the `env-config` feature is enabled, you can load configuration
//! from environment variables and an optional `app.env` file:
//!
//! ```rust,ignore
//! use webshot_api::config::env::from_env;
//!
//! let config = from_env()?;
//! ```
//!
//! See [`mod@env`] module for available environment variables.

use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// Accepted viewport dimensions, in CSS pixels.
///
/// Requests outside these ranges are rejected by the validator when
/// [`CaptureConfig::viewport_limits`] is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportLimits {
    /// Accepted widths.
    pub width: RangeInclusive<u32>,
    /// Accepted heights.
    pub height: RangeInclusive<u32>,
}

impl ViewportLimits {
    /// Create limits from explicit ranges.
    pub fn new(width: RangeInclusive<u32>, height: RangeInclusive<u32>) -> Self {
        Self { width, height }
    }
}

impl Default for ViewportLimits {
    /// 320–3840 wide, 240–2160 high.
    fn default() -> Self {
        Self::new(320..=3840, 240..=2160)
    }
}

/// Configuration for the capture service.
///
/// Use [`CaptureConfigBuilder`] for validation and convenience.
///
/// # Fields Overview
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `storage_dir` | `public/uploads` | Directory screenshots are written to |
/// | `public_path` | `/uploads` | URL prefix the storage root is served under |
/// | `navigation_timeout` | 30s | Limit for reaching the readiness condition |
/// | `operation_timeout` | 90s | Limit for a whole capture request |
/// | `viewport_limits` | 320–3840 × 240–2160 | Accepted viewport sizes (`None` = any positive size) |
/// | `max_concurrent_captures` | unbounded | Simultaneous browser instances |
/// | `chrome_path` | auto | Chrome/Chromium binary |
/// | `bind_addr` | `127.0.0.1:3000` | HTTP listen address |
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Directory screenshots are written to. Created on first use.
    pub storage_dir: PathBuf,

    /// URL path prefix under which `storage_dir` is served.
    ///
    /// Always starts with `/` and never ends with one (except for `/` itself).
    pub public_path: String,

    /// Maximum time a navigation may take to reach its readiness condition.
    ///
    /// # Default
    ///
    /// 30 seconds
    pub navigation_timeout: Duration,

    /// Maximum time the HTTP layer waits for one capture.
    ///
    /// Must be greater than `navigation_timeout` so that a slow navigation
    /// surfaces as a navigation failure rather than an operation timeout.
    ///
    /// # Default
    ///
    /// 90 seconds
    pub operation_timeout: Duration,

    /// Accepted viewport sizes.
    ///
    /// `None` accepts any positive width and height.
    pub viewport_limits: Option<ViewportLimits>,

    /// Upper bound on simultaneous captures (and therefore browser processes).
    ///
    /// `None` leaves captures unbounded.
    pub max_concurrent_captures: Option<usize>,

    /// Chrome/Chromium binary. `None` uses auto-detection.
    pub chrome_path: Option<String>,

    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

impl Default for CaptureConfig {
    /// Production-ready default configuration.
    ///
    /// ```rust
    /// use webshot_api::CaptureConfig;
    /// use std::time::Duration;
    ///
    /// let config = CaptureConfig::default();
    ///
    /// assert_eq!(config.public_path, "/uploads");
    /// assert_eq!(config.navigation_timeout, Duration::from_secs(30));
    /// assert!(config.viewport_limits.is_some());
    /// assert!(config.max_concurrent_captures.is_none());
    /// ```
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("public/uploads"),
            public_path: "/uploads".to_string(),
            navigation_timeout: Duration::from_secs(30),
            operation_timeout: Duration::from_secs(90),
            viewport_limits: Some(ViewportLimits::default()),
            max_concurrent_captures: None,
            chrome_path: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

/// Builder for [`CaptureConfig`] with validation.
///
/// # Validation
///
/// The [`build()`](Self::build) method validates:
/// - `navigation_timeout` must be greater than 0
/// - `operation_timeout` must be greater than `navigation_timeout`
/// - `max_concurrent_captures`, when set, must be greater than 0
/// - `public_path` must start with `/`
/// - viewport limit ranges must be non-empty and exclude 0
pub struct CaptureConfigBuilder {
    config: CaptureConfig,
}

impl CaptureConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: CaptureConfig::default(),
        }
    }

    /// Set the storage directory.
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.storage_dir = dir.into();
        self
    }

    /// Set the public URL prefix of the storage directory.
    ///
    /// A trailing `/` is removed.
    ///
    /// ```rust
    /// use webshot_api::CaptureConfigBuilder;
    ///
    /// let config = CaptureConfigBuilder::new()
    ///     .public_path("/shots/")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.public_path, "/shots");
    /// ```
    pub fn public_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        let trimmed = path.trim_end_matches('/');
        self.config.public_path = if trimmed.is_empty() && path.starts_with('/') {
            "/".to_string()
        } else {
            trimmed.to_string()
        };
        self
    }

    /// Set the navigation timeout.
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.config.navigation_timeout = timeout;
        self
    }

    /// Set the overall operation timeout.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.config.operation_timeout = timeout;
        self
    }

    /// Set custom viewport limits.
    pub fn viewport_limits(mut self, limits: ViewportLimits) -> Self {
        self.config.viewport_limits = Some(limits);
        self
    }

    /// Accept any positive viewport size.
    pub fn unlimited_viewport(mut self) -> Self {
        self.config.viewport_limits = None;
        self
    }

    /// Bound the number of simultaneous captures.
    pub fn max_concurrent_captures(mut self, max: usize) -> Self {
        self.config.max_concurrent_captures = Some(max);
        self
    }

    /// Set a custom Chrome binary path.
    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Set the HTTP listen address.
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use webshot_api::CaptureConfigBuilder;
    ///
    /// let config = CaptureConfigBuilder::new()
    ///     .navigation_timeout(Duration::from_secs(60))
    ///     .operation_timeout(Duration::from_secs(30))
    ///     .build();
    /// assert!(config.is_err());
    /// ```
    pub fn build(self) -> std::result::Result<CaptureConfig, String> {
        let config = self.config;

        if config.navigation_timeout.is_zero() {
            return Err("navigation_timeout must be greater than 0".to_string());
        }

        if config.operation_timeout <= config.navigation_timeout {
            return Err("operation_timeout must be greater than navigation_timeout".to_string());
        }

        if config.max_concurrent_captures == Some(0) {
            return Err("max_concurrent_captures must be greater than 0".to_string());
        }

        if !config.public_path.starts_with('/') {
            return Err(format!(
                "public_path must start with '/', got '{}'",
                config.public_path
            ));
        }

        if let Some(limits) = &config.viewport_limits {
            for (name, range) in [("width", &limits.width), ("height", &limits.height)] {
                if range.is_empty() || *range.start() == 0 {
                    return Err(format!(
                        "viewport {} limits must be a non-empty range of positive values",
                        name
                    ));
                }
            }
        }

        Ok(config)
    }
}

impl Default for CaptureConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Environment Configuration (feature-gated)
// ============================================================================

/// Environment-based configuration loading.
///
/// This module is only available when the `env-config` feature is enabled.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `WEBSHOT_STORAGE_DIR` | path | `public/uploads` | Storage directory |
/// | `WEBSHOT_PUBLIC_PATH` | String | `/uploads` | Public URL prefix |
/// | `WEBSHOT_NAVIGATION_TIMEOUT_SECONDS` | u64 | 30 | Navigation timeout |
/// | `WEBSHOT_OPERATION_TIMEOUT_SECONDS` | u64 | 90 | Operation timeout |
/// | `WEBSHOT_ENFORCE_VIEWPORT_LIMITS` | bool | true | Reject viewports outside 320–3840 × 240–2160 |
/// | `WEBSHOT_MAX_CONCURRENT_CAPTURES` | usize | unbounded | Capture concurrency cap |
/// | `WEBSHOT_BIND_ADDR` | SocketAddr | `127.0.0.1:3000` | Listen address |
/// | `CHROME_PATH` | String | auto | Custom Chrome binary path |
///
/// Values that fail to parse are ignored in favour of the default.
///
/// # Example `app.env` File
///
/// ```text
/// WEBSHOT_STORAGE_DIR=public/uploads
/// WEBSHOT_NAVIGATION_TIMEOUT_SECONDS=30
/// WEBSHOT_MAX_CONCURRENT_CAPTURES=4
/// WEBSHOT_BIND_ADDR=0.0.0.0:3000
///
/// # CHROME_PATH=/usr/bin/google-chrome
/// ```
#[cfg(feature = "env-config")]
pub mod env {
    use super::*;
    use crate::error::BrowserError;
    use std::str::FromStr;

    /// Default environment file name.
    pub const ENV_FILE_NAME: &str = "app.env";

    /// Load environment variables from `app.env` file.
    ///
    /// Called by [`from_env`]; call it yourself only if you need the
    /// variables earlier.
    pub fn load_env_file() -> Result<std::path::PathBuf, dotenvy::Error> {
        dotenvy::from_filename(ENV_FILE_NAME)
    }

    fn parsed<T: FromStr>(name: &str) -> Option<T> {
        let raw = std::env::var(name).ok()?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("⚠️ Ignoring unparseable {}={:?}", name, raw);
                None
            }
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Also loads `app.env` if present.
    ///
    /// # Errors
    ///
    /// Returns [`BrowserError::Configuration`] if the resulting values
    /// fail [`CaptureConfigBuilder::build`] validation.
    pub fn from_env() -> Result<CaptureConfig, BrowserError> {
        match load_env_file() {
            Ok(path) => {
                log::info!("📄 Loaded configuration from: {:?}", path);
            }
            Err(e) => {
                log::debug!(
                    "📄 No {} file found or failed to load: {} (using environment variables and defaults)",
                    ENV_FILE_NAME,
                    e
                );
            }
        }

        let defaults = CaptureConfig::default();
        let mut builder = CaptureConfigBuilder::new();

        if let Some(dir) = parsed::<PathBuf>("WEBSHOT_STORAGE_DIR") {
            builder = builder.storage_dir(dir);
        }
        if let Some(path) = parsed::<String>("WEBSHOT_PUBLIC_PATH") {
            builder = builder.public_path(path);
        }

        let navigation_seconds = parsed("WEBSHOT_NAVIGATION_TIMEOUT_SECONDS")
            .unwrap_or(defaults.navigation_timeout.as_secs());
        let operation_seconds = parsed("WEBSHOT_OPERATION_TIMEOUT_SECONDS")
            .unwrap_or(defaults.operation_timeout.as_secs());
        builder = builder
            .navigation_timeout(Duration::from_secs(navigation_seconds))
            .operation_timeout(Duration::from_secs(operation_seconds));

        let enforce_limits = parsed::<bool>("WEBSHOT_ENFORCE_VIEWPORT_LIMITS").unwrap_or(true);
        if !enforce_limits {
            builder = builder.unlimited_viewport();
        }

        let max_concurrent = parsed::<usize>("WEBSHOT_MAX_CONCURRENT_CAPTURES");
        if let Some(max) = max_concurrent {
            builder = builder.max_concurrent_captures(max);
        }

        let bind_addr = parsed::<SocketAddr>("WEBSHOT_BIND_ADDR").unwrap_or(defaults.bind_addr);
        builder = builder.bind_addr(bind_addr);

        if let Some(path) = chrome_path_from_env() {
            builder = builder.chrome_path(path);
        }

        let config = builder.build().map_err(BrowserError::Configuration)?;

        log::info!("🔧 Loading capture configuration from environment:");
        log::info!("   - Storage dir: {}", config.storage_dir.display());
        log::info!("   - Public path: {}", config.public_path);
        log::info!("   - Navigation timeout: {}s", navigation_seconds);
        log::info!("   - Operation timeout: {}s", operation_seconds);
        log::info!("   - Viewport limits enforced: {}", enforce_limits);
        match max_concurrent {
            Some(max) => log::info!("   - Max concurrent captures: {}", max),
            None => log::info!("   - Max concurrent captures: unbounded"),
        }
        log::info!("   - Bind address: {}", config.bind_addr);

        Ok(config)
    }

    /// Get Chrome path from environment.
    ///
    /// Reads `CHROME_PATH`. Returns `None` when unset or blank.
    pub fn chrome_path_from_env() -> Option<String> {
        std::env::var("CHROME_PATH")
            .ok()
            .filter(|path| !path.trim().is_empty())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
