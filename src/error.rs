//! Error types for the Forkful library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`ForkfulError`] enum. Catalog failures are propagated to callers as-is;
//! cache failures are usually swallowed by the cache layer (fail-open) and only
//! surface from the raw [`CacheStore`](crate::cache::CacheStore) API.
//!
//! # Examples
//!
//! ```
//! use forkful::error::{ForkfulError, Result};
//!
//! fn lookup() -> Result<()> {
//!     Err(ForkfulError::catalog("restaurant collection unavailable"))
//! }
//!
//! match lookup() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Forkful operations.
#[derive(Error, Debug)]
pub enum ForkfulError {
    /// I/O errors (config and catalog files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Restaurant or menu catalog failures (timeouts, connection errors)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Cache store failures
    #[error("Cache error: {0}")]
    Cache(String),

    /// Encoding or decoding of cached payloads
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid caller input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A bounded wait expired
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Operation cancelled by the caller
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    /// Worker pool construction or task join failures
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ForkfulError.
pub type Result<T> = std::result::Result<T, ForkfulError>;

impl ForkfulError {
    /// Create a new catalog error.
    pub fn catalog<S: Into<String>>(msg: S) -> Self {
        ForkfulError::Catalog(msg.into())
    }

    /// Create a new cache error.
    pub fn cache<S: Into<String>>(msg: S) -> Self {
        ForkfulError::Cache(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        ForkfulError::Serialization(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ForkfulError::Config(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ForkfulError::InvalidArgument(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        ForkfulError::Timeout(msg.into())
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        ForkfulError::OperationCancelled(msg.into())
    }

    /// Create a new thread pool error.
    pub fn thread_pool<S: Into<String>>(msg: S) -> Self {
        ForkfulError::ThreadPool(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ForkfulError::Other(msg.into())
    }

    /// Whether this error came from the catalog collaborators.
    pub fn is_catalog(&self) -> bool {
        matches!(self, ForkfulError::Catalog(_))
    }

    /// Whether this error is a caller cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ForkfulError::OperationCancelled(_))
    }
}

impl From<bincode::Error> for ForkfulError {
    fn from(err: bincode::Error) -> Self {
        ForkfulError::Serialization(err.to_string())
    }
}
