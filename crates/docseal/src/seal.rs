//! The DocSeal facade.

use std::sync::Arc;

use docseal_core::{
    CryptoProvider, Document, Ed25519PublicKey, Ed25519Signature, PrivateKey, Sha256Hash,
    StandardCrypto,
};
use docseal_perms::{DocumentKey, DocumentKeyResolver, FileCipher};

use crate::builder::{CreateDocument, UpdateDocument};
use crate::config::DocSealConfig;
use crate::error::{DocError, Result};
use crate::requester::KeyRequester;

/// Entry point holding the crypto provider, configuration, and key requester.
///
/// Builders produced here inherit all three.
#[derive(Clone)]
pub struct DocSeal {
    provider: Arc<dyn CryptoProvider>,
    config: DocSealConfig,
    requester: Option<Arc<dyn KeyRequester>>,
}

impl DocSeal {
    pub fn new(config: DocSealConfig) -> Self {
        Self {
            provider: Arc::new(StandardCrypto),
            config,
            requester: None,
        }
    }

    pub fn with_crypto(mut self, provider: Arc<dyn CryptoProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_key_requester(mut self, requester: Arc<dyn KeyRequester>) -> Self {
        self.requester = Some(requester);
        self
    }

    /// Start building a new document.
    pub fn create(&self) -> CreateDocument {
        let builder = CreateDocument::new()
            .with_crypto(self.provider.clone())
            .with_config(self.config.clone());
        match &self.requester {
            Some(requester) => builder.key_requester(requester.clone()),
            None => builder,
        }
    }

    /// Start building changes to `original`.
    pub fn update(&self, original: Document) -> UpdateDocument {
        let builder = UpdateDocument::new(original)
            .with_crypto(self.provider.clone())
            .with_config(self.config.clone());
        match &self.requester {
            Some(requester) => builder.key_requester(requester.clone()),
            None => builder,
        }
    }

    /// Recover a stored document's key.
    pub fn document_key(&self, document: &Document, private_key: &PrivateKey) -> Result<DocumentKey> {
        Ok(DocumentKeyResolver::new(self.provider.as_ref()).resolve(document, private_key)?)
    }

    /// Decrypt a document's file body.
    pub fn decrypt_file(
        &self,
        document: &Document,
        ciphertext: &[u8],
        private_key: &PrivateKey,
    ) -> Result<Vec<u8>> {
        let key = self.document_key(document, private_key)?;
        let plaintext = FileCipher::new(self.provider.as_ref()).decrypt(ciphertext, &key)?;
        tracing::debug!(
            document = document.label(),
            size = plaintext.len(),
            "file decrypted"
        );
        Ok(plaintext)
    }

    /// SHA-256 of `bytes`, hex.
    pub fn hash_file(&self, bytes: &[u8]) -> String {
        self.provider.hash(bytes).to_hex()
    }

    /// Sign the document's raw file digest.
    ///
    /// The signature covers the 32 digest bytes, not their hex encoding.
    pub fn sign_raw(&self, document: &Document, private_key: &PrivateKey) -> Result<Ed25519Signature> {
        let digest = raw_digest(document)?;
        Ok(self.provider.sign(digest.as_bytes(), private_key))
    }

    /// Check a signature produced by [`DocSeal::sign_raw`].
    pub fn verify_raw(
        &self,
        document: &Document,
        signature: &Ed25519Signature,
        public_key: &Ed25519PublicKey,
    ) -> Result<bool> {
        let digest = raw_digest(document)?;
        Ok(self.provider.verify(digest.as_bytes(), signature, public_key))
    }
}

impl Default for DocSeal {
    fn default() -> Self {
        Self::new(DocSealConfig::default())
    }
}

fn raw_digest(document: &Document) -> Result<Sha256Hash> {
    let raw_hash = document.raw_hash.as_deref().ok_or_else(|| {
        DocError::InvalidDocument(format!("document {} has no raw_hash", document.label()))
    })?;
    Sha256Hash::from_hex(raw_hash).map_err(|e| {
        DocError::InvalidDocument(format!(
            "raw_hash of document {} is not a SHA-256 digest: {e}",
            document.label()
        ))
    })
}
