//! Error types for the permissions module.

use docseal_core::{CoreError, EntityId};
use thiserror::Error;

/// Errors that can occur while resolving keys or participants.
#[derive(Debug, Error)]
pub enum PermsError {
    /// A sealed key failed authentication during key resolution.
    #[error("decryption failed for {context}: {source}")]
    Decryption {
        context: String,
        #[source]
        source: CoreError,
    },

    /// A file body failed its MAC check.
    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),

    /// The document key could not be sealed for a participant.
    #[error("failed to wrap document key for {participant}: {source}")]
    KeyWrap {
        participant: EntityId,
        #[source]
        source: CoreError,
    },

    /// Key bytes had the wrong shape.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// A participant needs wrapping but no sender key was supplied.
    #[error("no private key available to wrap the document key for {0}")]
    MissingPrivateKey(EntityId),

    /// A participant needs the document key but it was not resolved.
    #[error("document key not resolved")]
    MissingDocumentKey,

    /// Core error.
    #[error("core error: {0}")]
    CoreError(#[from] CoreError),
}

impl PermsError {
    /// Wrap a core failure with the place it happened.
    pub fn decryption(context: impl Into<String>, source: CoreError) -> Self {
        Self::Decryption {
            context: context.into(),
            source,
        }
    }
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
