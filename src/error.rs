//! Error types.
//!
//! `Error` is the crate-wide error; each domain has its own enum so callers
//! can match on the failure they care about.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Kms(#[from] KmsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid encoding: {0}")]
    Encoding(String),
}

/// Errors raised while resolving keys or talking to the KMS.
#[derive(Error, Debug)]
pub enum KmsError {
    /// The client was asked for a key URI it does not cover.
    #[error("unsupported key URI: {0}")]
    UnsupportedKey(String),

    /// No registered client claims the key URI.
    #[error("no KMS client supports key URI: {0}")]
    NoClientFound(String),

    #[error("invalid key URI: {0}")]
    InvalidKeyUri(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("KMS call cancelled")]
    Cancelled,

    #[error("KMS call deadline exceeded")]
    DeadlineExceeded,
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("no KMS clients configured")]
    NoClients,

    #[error("KMS backend unavailable: {0}")]
    BackendUnavailable(String),
}

/// A failure reported by the remote service or its transport.
///
/// The original error is kept as the `source` and its message is shown
/// as-is. Nothing is classified or retried here.
#[derive(Debug)]
pub struct RemoteError {
    operation: &'static str,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl RemoteError {
    /// Wrap an error returned by the remote `operation` (e.g. `"Encrypt"`).
    pub fn new<E>(operation: &'static str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            operation,
            source: source.into(),
        }
    }

    /// Name of the remote operation that failed.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KMS {} failed: {}", self.operation, self.source)
    }
}

impl std::error::Error for RemoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl From<RemoteError> for Error {
    fn from(e: RemoteError) -> Self {
        Error::Kms(KmsError::Remote(e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
