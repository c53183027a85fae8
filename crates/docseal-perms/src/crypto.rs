//! The document key.

use std::fmt;

use docseal_core::CryptoProvider;

use crate::error::{PermsError, Result};

/// Length of a document key in bytes.
pub const DOCUMENT_KEY_LEN: usize = 32;

/// A 256-bit symmetric key protecting one document's file body.
#[derive(Clone)]
pub struct DocumentKey([u8; DOCUMENT_KEY_LEN]);

impl DocumentKey {
    /// Generate a fresh key from the provider's secure random source.
    pub fn generate(provider: &dyn CryptoProvider) -> Result<Self> {
        Self::from_slice(&provider.random_bytes(DOCUMENT_KEY_LEN))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; DOCUMENT_KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; DOCUMENT_KEY_LEN] = bytes.try_into().map_err(|_| {
            PermsError::InvalidKey(format!(
                "expected {} byte document key, got {}",
                DOCUMENT_KEY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| PermsError::InvalidKey(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; DOCUMENT_KEY_LEN] {
        &self.0
    }

    /// Convert to hex string.
    ///
    /// Only public documents ever publish this.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DocumentKey(..)")
    }
}
