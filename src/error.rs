//! Error types for warren operations.
//!
//! Errors are grouped by concern (resolution, storage, validation) and
//! wrapped by the crate-level [`Error`] so callers can match on either
//! the category or the specific failure.

use thiserror::Error;

/// Failures raised when a batch of key resolutions is verified.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// One or more keys could not be resolved. The message carries every
    /// accumulated diagnostic, one per line.
    #[error("failed to resolve secret keys:\n\t{0}")]
    UnresolvedKeys(String),
}

/// Failures from a secret store backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("malformed secret id: {0}")]
    MalformedId(String),

    #[error("unknown secret id: {0}")]
    UnknownId(String),

    #[error("vault file not found: {0}")]
    VaultNotFound(String),

    #[error("invalid vault snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("failed to read vault file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to write vault file: {0}")]
    WriteFile(#[source] std::io::Error),

    #[error("vault parse error: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("vault serialize error: {0}")]
    Serialize(#[source] toml::ser::Error),
}

/// Failures validating permalinks and secret keys.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("permalink cannot be empty")]
    EmptyPermalink,

    #[error("invalid permalink '{value}': {reason}")]
    InvalidPermalink { value: String, reason: String },

    #[error("secret key cannot be empty")]
    EmptyKey,

    #[error("invalid secret key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
}

/// Crate-level error wrapping all failure categories.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, Error>;
