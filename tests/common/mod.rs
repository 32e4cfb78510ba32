//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use webshot_api::factory::mock::MockBrowserFactory;
use webshot_api::{CapturePipeline, ScreenshotStore};

/// A unique storage directory under the system temp dir, removed on drop.
pub struct TempStorage {
    root: PathBuf,
}

impl TempStorage {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("webshot-test-{}", uuid::Uuid::new_v4()));
        Self { root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Names of the files written so far, sorted.
    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl Drop for TempStorage {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// A valid request body for `file_name`.
pub fn request_json(file_name: &str) -> Value {
    json!({
        "url": "https://example.com",
        "viewportWidth": 1280,
        "viewportHeight": 1024,
        "fullPage": false,
        "waitStrategy": "network-idle-strict",
        "fileName": file_name
    })
}

/// `request_json` with one field replaced.
pub fn request_with(file_name: &str, field: &str, value: Value) -> Value {
    let mut body = request_json(file_name);
    body[field] = value;
    body
}

/// A pipeline over `factory` writing into `storage` under `/uploads`.
pub fn pipeline(factory: MockBrowserFactory, storage: &TempStorage) -> CapturePipeline {
    CapturePipeline::new(
        Arc::new(factory),
        ScreenshotStore::new(storage.path(), "/uploads"),
        Duration::from_millis(300),
    )
}
