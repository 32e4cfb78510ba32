//! Web framework integrations.
//!
//! The capture service itself lives in [`service`](crate::service) and does
//! not depend on any web framework. This module adapts it to HTTP.
//!
//! # Available Integrations
//!
//! | Framework | Feature Flag | Module |
//! |-----------|--------------|--------|
//! | Axum | `axum-integration` | `axum` |
//!
//! # Enabling Integrations
//!
//! The Axum integration is enabled by default. To use only the library core:
//!
//! ```toml
//! [dependencies]
//! webshot-api = { version = "0.1", default-features = false }
//! ```
//!
//! # Common Pattern
//!
//! 1. Load a [`CaptureConfig`](crate::CaptureConfig) at startup
//! 2. Build a [`CapturePipeline`](crate::CapturePipeline) around a browser factory
//! 3. Wrap both in the framework's shared state
//! 4. Run the blocking pipeline off the async runtime in each handler

#[cfg(feature = "axum-integration")]
pub mod axum;
