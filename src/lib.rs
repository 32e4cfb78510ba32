//! # webshot-api
//!
//! Headless Chrome web screenshot service with an Axum HTTP front end.
//!
//! A client submits a target URL, a viewport, a readiness condition and an
//! output file name. The service validates the request, renders the page in
//! a browser instance launched just for that request, stores the image under
//! a public directory and answers with the image's public path.
//!
//! ## Features
//!
//! - **Strict Validation**: Every field is checked before any browser starts;
//!   file names can never escape the storage directory
//! - **Per-Request Isolation**: One exclusive browser session per capture,
//!   never shared, never pooled
//! - **Guaranteed Teardown**: RAII session guard releases the browser on
//!   every exit path, exactly once
//! - **Readiness Strategies**: Network-idle (strict and lenient), DOM parsed,
//!   or full load
//! - **Full-Page Capture**: Measures the document and resizes the surface
//! - **Web Framework Integration**: Optional Axum router with static serving
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │     HTTP (integrations::axum)               │
//! │  POST /api/web-screenshot, /health, /stats  │
//! └─────────────────┬───────────────────────────┘
//!                   │ raw JSON body
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │     Request Validator (service::validate)   │
//! └─────────────────┬───────────────────────────┘
//!                   │ CaptureRequest
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │     CapturePipeline (service::capture)      │
//! │ ┌─────────────────────────────────────────┐ │
//! │ │ BrowserFactory ──▶ SessionGuard         │ │
//! │ │ configure ▶ navigate ▶ render ▶ persist │ │
//! │ │ teardown (always)                       │ │
//! │ └─────────────────────────────────────────┘ │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │   Headless Chrome  +  ScreenshotStore       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use webshot_api::prelude::*;
//! use webshot_api::service::validate_payload;
//!
//! let config = CaptureConfig::default();
//! let pipeline = CapturePipeline::from_config(
//!     Arc::new(ChromeBrowserFactory::with_defaults()),
//!     &config,
//! );
//!
//! let request = validate_payload(
//!     br#"{"url":"https://example.com","viewportWidth":1280,"viewportHeight":1024,
//!          "fullPage":true,"waitStrategy":"load-complete","fileName":"shot1.jpg"}"#,
//!     config.viewport_limits.as_ref(),
//! )?;
//!
//! let stored = pipeline.run(&request)?;
//! assert_eq!(stored.public_path, "/uploads/shot1.jpg");
//! ```
//!
//! ## Environment Configuration
//!
//! When the `env-config` feature is enabled, [`from_env`] reads the
//! configuration from the environment, after loading an `app.env` file if
//! one exists.
//!
//! | Variable | Type | Default | Description |
//! |----------|------|---------|-------------|
//! | `WEBSHOT_STORAGE_DIR` | path | `public/uploads` | Where screenshots are written |
//! | `WEBSHOT_PUBLIC_PATH` | String | `/uploads` | URL prefix of the storage dir |
//! | `WEBSHOT_NAVIGATION_TIMEOUT_SECONDS` | u64 | 30 | Readiness deadline |
//! | `WEBSHOT_OPERATION_TIMEOUT_SECONDS` | u64 | 90 | Whole-request deadline |
//! | `WEBSHOT_ENFORCE_VIEWPORT_LIMITS` | bool | true | Range-check viewport sizes |
//! | `WEBSHOT_MAX_CONCURRENT_CAPTURES` | usize | unbounded | Simultaneous captures |
//! | `WEBSHOT_BIND_ADDR` | SocketAddr | `127.0.0.1:3000` | HTTP listen address |
//! | `CHROME_PATH` | String | auto | Custom Chrome binary path |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `env-config` | Enable environment-based configuration |
//! | `axum-integration` | Axum router and the `webshot-api` binary |
//! | `test-utils` | Enable mock factory for testing |

#![doc(html_root_url = "https://docs.rs/webshot-api/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod error;
pub mod factory;
pub mod prelude;
pub mod service;
pub mod session;
pub mod stats;
pub mod storage;

// ============================================================================
// Feature-gated modules
// ============================================================================

/// Web framework integrations.
///
/// Enable `axum-integration` to use them.
#[cfg(feature = "axum-integration")]
pub mod integrations;

// ============================================================================
// Re-exports (Public API)
// ============================================================================

// Core types
pub use config::{CaptureConfig, CaptureConfigBuilder, ViewportLimits};
pub use error::{BrowserError, Result};
pub use factory::{BrowserFactory, ChromeBrowserFactory, create_chrome_options};
pub use service::CapturePipeline;
pub use session::{BrowserSession, ChromeSession, SessionGuard};
pub use stats::{CaptureCounters, CaptureStats};
pub use storage::ScreenshotStore;

// Feature-gated re-exports
#[cfg(feature = "env-config")]
pub use config::env::{chrome_path_from_env, from_env};
