//! Error types for loading.

use ironproto_schema::SchemaError;
use thiserror::Error;

/// A fetch collaborator failure.
#[derive(Debug, Error)]
#[error("failed to fetch '{path}'")]
pub struct FetchError {
    /// The resolved path that failed.
    pub path: String,
    /// Underlying cause.
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl FetchError {
    /// Wraps an arbitrary cause.
    pub fn new(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            path: path.into(),
            source: source.into(),
        }
    }

    /// A path the fetcher has no entry for.
    pub fn not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            source: Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file: {path}"),
            )),
            path,
        }
    }
}

/// A parse collaborator failure.
#[derive(Debug, Error)]
#[error("failed to parse '{filename}': {message}")]
pub struct ParseError {
    /// The file being parsed.
    pub filename: String,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    /// Creates a parse error.
    pub fn new(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            message: message.into(),
        }
    }
}

/// Error type for load operations.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A non-weak fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A non-weak file failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Schema construction rejected the loaded content.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// `load_sync` was called on a fetcher with no synchronous primitive.
    #[error("synchronous loading is not supported by this fetcher")]
    SyncNotSupported,
}

/// Result type alias for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
