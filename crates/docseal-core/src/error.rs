//! Error types for DocSeal Core.

use thiserror::Error;

/// Core errors raised by the cryptographic primitives.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// An envelope failed authentication or could not be parsed.
    #[error("decryption failed: {0}")]
    DecryptionFailed(String),

    /// A file body failed its MAC check.
    #[error("invalid checksum: {0}")]
    InvalidChecksum(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
