//! Reference fetch collaborators.
//!
//! [`FsFetcher`] reads from a base directory; [`MemoryFetcher`] serves an
//! in-memory table and can inject per-path delays and failures, which is
//! what the completion-ordering tests are built on.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::traits::Fetch;

/// Serves files from a directory on disk.
///
/// The async path goes through `tokio::fs`; the synchronous primitive is
/// `std::fs`, so `load_sync` works with this fetcher.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    base: PathBuf,
}

impl FsFetcher {
    /// Creates a fetcher rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    fn join(&self, path: &str) -> PathBuf {
        self.base.join(path)
    }
}

#[async_trait]
impl Fetch for FsFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        tokio::fs::read_to_string(self.join(path))
            .await
            .map_err(|e| FetchError::new(path, e))
    }

    fn fetch_sync(&self, path: &str) -> Option<Result<String, FetchError>> {
        Some(std::fs::read_to_string(self.join(path)).map_err(|e| FetchError::new(path, e)))
    }
}

/// Serves files from an in-memory table.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    fetches: AtomicUsize,
}

impl MemoryFetcher {
    /// Creates an empty fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.files.insert(path.into(), source.into());
        self
    }

    /// Delays async fetches of one path, to steer completion order.
    #[must_use]
    pub fn with_delay(mut self, path: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }

    /// Number of fetch calls served so far (sync and async).
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    fn get(&self, path: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::not_found(path))
    }
}

#[async_trait]
impl Fetch for MemoryFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        self.get(path)
    }

    fn fetch_sync(&self, path: &str) -> Option<Result<String, FetchError>> {
        Some(self.get(path))
    }
}
