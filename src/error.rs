//! Error types for Larder
//!
//! Provides a closed error taxonomy for all store operations. Each failing
//! operation maps to exactly one variant, and I/O or codec causes are kept as
//! the error `source()`.

use std::io;

use thiserror::Error;

/// Result type alias using StorageError
pub type Result<T> = std::result::Result<T, StorageError>;

/// Unified error type for Larder operations
#[derive(Debug, Error)]
pub enum StorageError {
    // -------------------------------------------------------------------------
    // Read Errors
    // -------------------------------------------------------------------------
    #[error("Key not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Mutation Errors
    // -------------------------------------------------------------------------
    #[error("Write failed for key '{key}': {source}")]
    WriteFailed {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("List failed for '{dir}': {source}")]
    ListFailed {
        dir: String,
        #[source]
        source: io::Error,
    },

    #[error("Move failed from '{from}' to '{to}': {source}")]
    MoveFailed {
        from: String,
        to: String,
        #[source]
        source: io::Error,
    },

    /// `removed` entries were already deleted by the same call and stay deleted.
    #[error("Remove failed for key '{key}' after {removed} removal(s): {source}")]
    RemoveFailed {
        key: String,
        removed: usize,
        #[source]
        source: io::Error,
    },

    // -------------------------------------------------------------------------
    // Typed Layer Errors
    // -------------------------------------------------------------------------
    #[error("Encode failed for key '{key}': {source}")]
    EncodeFailed {
        key: String,
        #[source]
        source: CodecError,
    },

    #[error("Decode failed for key '{key}': {source}")]
    DecodeFailed {
        key: String,
        #[source]
        source: CodecError,
    },

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    // -------------------------------------------------------------------------
    // Lane Errors
    // -------------------------------------------------------------------------
    #[error("Lane unavailable: {0}")]
    LaneUnavailable(String),
}

/// Fieldless discriminant of [`StorageError`]
///
/// Lets callers (and tests) compare outcomes kind-for-kind without caring
/// about the wrapped causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    WriteFailed,
    ListFailed,
    MoveFailed,
    RemoveFailed,
    EncodeFailed,
    DecodeFailed,
    InvalidKey,
    LaneUnavailable,
}

impl StorageError {
    /// The kind of this error, without its payload
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorageError::NotFound(_) => ErrorKind::NotFound,
            StorageError::WriteFailed { .. } => ErrorKind::WriteFailed,
            StorageError::ListFailed { .. } => ErrorKind::ListFailed,
            StorageError::MoveFailed { .. } => ErrorKind::MoveFailed,
            StorageError::RemoveFailed { .. } => ErrorKind::RemoveFailed,
            StorageError::EncodeFailed { .. } => ErrorKind::EncodeFailed,
            StorageError::DecodeFailed { .. } => ErrorKind::DecodeFailed,
            StorageError::InvalidKey { .. } => ErrorKind::InvalidKey,
            StorageError::LaneUnavailable(_) => ErrorKind::LaneUnavailable,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Errors raised by a [`Codec`](crate::typed::Codec)
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Bincode error: {0}")]
    Bincode(#[from] bincode::Error),
}
