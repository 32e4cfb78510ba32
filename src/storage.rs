//! Storage root for captured screenshots.
//!
//! [`ScreenshotStore`] owns the directory screenshots are written to and the
//! public URL prefix that directory is served under. It only accepts a
//! validated [`FileName`], so every write lands directly inside the root.

use std::io;
use std::path::{Path, PathBuf};

use crate::config::CaptureConfig;
use crate::service::{FileName, ImageFormat, StoredScreenshot};

/// Directory of stored screenshots plus its public URL prefix.
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    root: PathBuf,
    public_path: String,
}

impl ScreenshotStore {
    /// Create a store rooted at `root`, served under `public_path`.
    ///
    /// The directory is not created until the first write.
    pub fn new(root: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_path: public_path.into(),
        }
    }

    /// Create a store from the configured storage directory and public path.
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(config.storage_dir.clone(), config.public_path.clone())
    }

    /// Directory screenshots are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix the root is served under.
    pub fn public_prefix(&self) -> &str {
        &self.public_path
    }

    /// Public URL path of `name`.
    ///
    /// The file name is percent-encoded, so names containing `%`, `#`, `?`
    /// or spaces still resolve to the stored file.
    ///
    /// ```rust
    /// use webshot_api::ScreenshotStore;
    ///
    /// let store = ScreenshotStore::new("public/uploads", "/uploads");
    /// # let name = webshot_api::service::validate_file_name("shot1.jpg").unwrap().0;
    /// assert_eq!(store.public_url(&name), "/uploads/shot1.jpg");
    /// # let name = webshot_api::service::validate_file_name("shot 1.jpg").unwrap().0;
    /// assert_eq!(store.public_url(&name), "/uploads/shot%201.jpg");
    /// ```
    pub fn public_url(&self, name: &FileName) -> String {
        let prefix = self.public_path.trim_end_matches('/');
        format!("{}/{}", prefix, urlencoding::encode(name.as_str()))
    }

    /// Location on disk of `name`.
    pub fn file_path(&self, name: &FileName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Write `bytes` as `name`, creating the root directory if absent.
    ///
    /// An existing file of the same name is replaced.
    ///
    /// # Errors
    ///
    /// Any I/O error from creating the directory or writing the file.
    pub fn persist(
        &self,
        name: &FileName,
        format: ImageFormat,
        bytes: &[u8],
    ) -> io::Result<StoredScreenshot> {
        std::fs::create_dir_all(&self.root)?;

        let file_path = self.file_path(name);
        std::fs::write(&file_path, bytes)?;

        log::debug!("💾 Wrote {} bytes to {}", bytes.len(), file_path.display());

        Ok(StoredScreenshot {
            public_path: self.public_url(name),
            file_path,
            size: bytes.len(),
            format,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::validate_file_name;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("webshot-store-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_persist_creates_directory() {
        let root = temp_root().join("nested").join("uploads");
        let store = ScreenshotStore::new(&root, "/uploads");
        let (name, format) = validate_file_name("shot1.jpg").unwrap();

        let stored = store.persist(&name, format, b"\xFF\xD8\xFF").unwrap();

        assert_eq!(stored.public_path, "/uploads/shot1.jpg");
        assert_eq!(stored.file_path, root.join("shot1.jpg"));
        assert_eq!(stored.size, 3);
        assert_eq!(std::fs::read(&stored.file_path).unwrap(), b"\xFF\xD8\xFF");

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_persist_overwrites_existing_file() {
        let root = temp_root();
        let store = ScreenshotStore::new(&root, "/uploads");
        let (name, format) = validate_file_name("same.png").unwrap();

        store.persist(&name, format, b"first").unwrap();
        let stored = store.persist(&name, format, b"second").unwrap();

        assert_eq!(std::fs::read(&stored.file_path).unwrap(), b"second");
        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn test_persist_fails_when_root_is_a_file() {
        let root = temp_root();
        std::fs::write(&root, b"not a directory").unwrap();

        let store = ScreenshotStore::new(&root, "/uploads");
        let (name, format) = validate_file_name("shot.png").unwrap();

        assert!(store.persist(&name, format, b"data").is_err());
        let _ = std::fs::remove_file(root);
    }

    #[test]
    fn test_public_url_with_root_prefix() {
        let store = ScreenshotStore::new("public", "/");
        let (name, _) = validate_file_name("a.webp").unwrap();
        assert_eq!(store.public_url(&name), "/a.webp");
    }

    #[test]
    fn test_public_url_escapes_reserved_characters() {
        let store = ScreenshotStore::new("public/uploads", "/uploads/");
        for (raw, expected) in [
            ("shot 1.png", "/uploads/shot%201.png"),
            ("a%41.png", "/uploads/a%2541.png"),
            ("shot#1.png", "/uploads/shot%231.png"),
            ("q?x.png", "/uploads/q%3Fx.png"),
            ("plain-name_1.png", "/uploads/plain-name_1.png"),
        ] {
            let (name, _) = validate_file_name(raw).unwrap();
            assert_eq!(store.public_url(&name), expected, "{}", raw);
        }
    }
}
