//! Error types for DocSeal.

use std::path::PathBuf;

use docseal_perms::PermsError;
use thiserror::Error;

/// Errors that can occur while building or opening documents.
///
/// Every error is terminal for the current build; nothing is retried.
#[derive(Debug, Error)]
pub enum DocError {
    /// The builder was used out of order (no key requester, no file).
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// The key requester declined or failed to supply a private key.
    #[error("key request failed for {operation}: {source}")]
    KeyRequest {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Permission error (key resolution, wrapping, file authentication).
    #[error("permission error: {0}")]
    Permission(#[from] PermsError),

    /// The source file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source file exceeds the configured limit.
    #[error("file too large: {size} bytes exceeds limit of {limit}")]
    FileTooLarge { size: u64, limit: u64 },

    /// Stored document fields could not be interpreted.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl DocError {
    /// Whether a sealed key failed authentication.
    pub fn is_decryption(&self) -> bool {
        matches!(self, DocError::Permission(PermsError::Decryption { .. }))
    }

    /// Whether a file body failed authentication.
    pub fn is_invalid_checksum(&self) -> bool {
        matches!(self, DocError::Permission(PermsError::InvalidChecksum(_)))
    }
}

/// Result type for DocSeal operations.
pub type Result<T> = std::result::Result<T, DocError>;
