//! Collaborator traits: fetching file contents and parsing `.proto` text.

use async_trait::async_trait;
use ironproto_schema::Root;

use crate::error::{FetchError, ParseError};

/// Load-time options, passed through to the parse collaborator.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Keep field names as declared instead of letting the parser apply its
    /// naming convention.
    pub keep_case: bool,
    /// Skip the bundled well-known-type table and fetch `google/protobuf/*`
    /// like any other import.
    pub skip_bundled: bool,
}

/// Retrieves file contents by resolved path.
///
/// I/O handles are owned by the implementation; the loader only sees
/// returned strings.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetches one file asynchronously.
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;

    /// Fetches one file synchronously, or `None` if this fetcher has no
    /// synchronous primitive (in which case `load_sync` is unsupported).
    fn fetch_sync(&self, path: &str) -> Option<Result<String, FetchError>> {
        let _ = path;
        None
    }
}

#[async_trait]
impl<T: Fetch + ?Sized> Fetch for &T {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        (**self).fetch(path).await
    }

    fn fetch_sync(&self, path: &str) -> Option<Result<String, FetchError>> {
        (**self).fetch_sync(path)
    }
}

/// Result of parsing one `.proto` source file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Plain imports, in declaration order.
    pub imports: Vec<String>,
    /// Imports whose failure does not abort the load.
    pub weak_imports: Vec<String>,
    /// Declared package, if any.
    pub package: Option<String>,
    /// Declared syntax level, if any.
    pub syntax: Option<String>,
}

/// Parses `.proto` text into the schema tree.
///
/// The tokenizer/parser itself is an external collaborator; the loader only
/// depends on this seam. JSON descriptor sources never reach it.
pub trait Parse: Send + Sync {
    /// Parses `source`, registering declarations under `root`, and returns
    /// the file's imports.
    fn parse(
        &self,
        filename: &str,
        source: &str,
        root: &mut Root,
        options: &LoadOptions,
    ) -> Result<ParsedFile, ParseError>;
}
