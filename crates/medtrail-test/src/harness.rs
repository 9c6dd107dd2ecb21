//! Test harness helpers.

use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};
use tracing_subscriber::EnvFilter;

/// Create a temporary directory for testing.
///
/// The directory is removed when the returned `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn test_dir() -> TempDir {
    TempDir::with_prefix("medtrail-").expect("Failed to create temp directory")
}

/// Create a temporary TOML file with the given content.
///
/// # Panics
///
/// Panics if the file cannot be created or written.
#[must_use]
pub fn test_toml_file(content: &str) -> NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

/// Set up test logging with the given filter.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// A temp directory holding a persistent store and config files.
#[derive(Debug)]
pub struct TestContext {
    /// Temporary directory for the test.
    pub dir: TempDir,
}

impl TestContext {
    /// Create a new test context.
    #[must_use]
    pub fn new() -> Self {
        Self { dir: test_dir() }
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Path for a store directory inside the context. Not created.
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    /// Write a file inside the context and return its path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_dir() {
        let dir = test_dir();
        assert!(dir.path().exists());
    }

    #[test]
    fn test_toml_file_suffix() {
        let file = test_toml_file("[access]\n");
        assert!(file.path().to_string_lossy().ends_with(".toml"));
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "[access]\n");
    }

    #[test]
    fn test_context_files() {
        let ctx = TestContext::new();
        let path = ctx.create_file("nested/config.toml", "x = 1");
        assert!(path.exists());
        assert!(!ctx.store_path().exists());
    }
}
