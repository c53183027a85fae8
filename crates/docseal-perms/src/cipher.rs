//! Authenticated encryption of document bodies.

use docseal_core::{CoreError, CryptoProvider};

use crate::crypto::DocumentKey;
use crate::error::{PermsError, Result};

/// Encrypts and decrypts file bodies under a [`DocumentKey`].
pub struct FileCipher<'a> {
    provider: &'a dyn CryptoProvider,
}

impl<'a> FileCipher<'a> {
    pub fn new(provider: &'a dyn CryptoProvider) -> Self {
        Self { provider }
    }

    /// Encrypt a file body.
    pub fn encrypt(&self, plaintext: &[u8], key: &DocumentKey) -> Result<Vec<u8>> {
        Ok(self.provider.symmetric_encrypt(plaintext, key.as_bytes())?)
    }

    /// Decrypt a file body.
    ///
    /// Fails with [`PermsError::InvalidChecksum`] when the body was tampered
    /// with, truncated, or encrypted under another key.
    pub fn decrypt(&self, ciphertext: &[u8], key: &DocumentKey) -> Result<Vec<u8>> {
        self.provider
            .symmetric_decrypt(ciphertext, key.as_bytes())
            .map_err(|e| match e {
                CoreError::InvalidChecksum(msg) => PermsError::InvalidChecksum(msg),
                other => PermsError::CoreError(other),
            })
    }
}
