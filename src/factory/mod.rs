//! Browser factory implementations.
//!
//! This module provides the [`BrowserFactory`] trait and implementations
//! for launching isolated browser sessions.
//!
//! # Overview
//!
//! Every capture launches its own browser through a factory, which allows:
//! - Different browser implementations (Chrome, Chromium, etc.)
//! - Custom launch configurations
//! - Mock factories for testing
//!
//! # Available Factories
//!
//! | Factory | Description |
//! |---------|-------------|
//! | [`ChromeBrowserFactory`] | Launches headless Chrome/Chromium |
//! | [`mock::MockBrowserFactory`] | Scripted sessions for testing (feature-gated) |
//!
//! # Example
//!
//! ```rust,ignore
//! use webshot_api::{BrowserFactory, ChromeBrowserFactory};
//!
//! let factory = ChromeBrowserFactory::with_defaults();
//! let mut session = factory.launch()?;
//! session.close()?;
//! ```

mod chrome;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use chrome::{ChromeBrowserFactory, create_chrome_options};

use crate::error::Result;
use crate::session::BrowserSession;

/// Trait for browser factory pattern.
///
/// Abstracts browser launching so the pipeline can run against Chrome in
/// production and against scripted sessions in tests.
///
/// # Thread Safety
///
/// This trait requires `Send + Sync` because one factory is shared by all
/// concurrent captures.
///
/// # Isolation
///
/// Each call to [`launch`](Self::launch) must return a session that shares
/// no profile, cookies or cache with any other session.
pub trait BrowserFactory: Send + Sync {
    /// Launch a fresh, isolated browser session.
    ///
    /// # Errors
    ///
    /// - [`BrowserError::Configuration`](crate::BrowserError::Configuration) -
    ///   Invalid launch options
    /// - [`BrowserError::Launch`](crate::BrowserError::Launch) -
    ///   Binary not found, process failed to start, etc.
    fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}
