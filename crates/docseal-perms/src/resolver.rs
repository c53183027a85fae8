//! Recovering an existing document's key.
//!
//! Three cases, checked in order:
//!
//! 1. Public documents carry the key in the clear (`filekey`).
//! 2. Workgroup documents seal the key to the workgroup, and seal the
//!    workgroup's private key to each member (`workgroup_key`). The caller's
//!    key opens the workgroup key, which opens the document key.
//! 3. Otherwise the key is sealed directly to the caller (`secret_key`).

use docseal_core::{CoreError, CryptoProvider, Document, PrivateKey};

use crate::crypto::DocumentKey;
use crate::error::{PermsError, Result};
use crate::keyshare::{unwrap_document_key, unwrap_private_key};

/// Resolves the document key from stored key material.
pub struct DocumentKeyResolver<'a> {
    provider: &'a dyn CryptoProvider,
}

impl<'a> DocumentKeyResolver<'a> {
    pub fn new(provider: &'a dyn CryptoProvider) -> Self {
        Self { provider }
    }

    /// Recover `document`'s key with the caller's private key.
    ///
    /// Fails with [`PermsError::Decryption`] if any layer fails authentication.
    pub fn resolve(&self, document: &Document, private_key: &PrivateKey) -> Result<DocumentKey> {
        let label = document.label();

        if document.public {
            tracing::debug!(document = label, "document key taken from public filekey");
            return Self::resolve_public(document);
        }

        let result = match &document.workgroup_key {
            Some(workgroup_key) => unwrap_private_key(
                self.provider,
                workgroup_key,
                private_key,
                &format!("workgroup_key of document {label}"),
            )
            .and_then(|workgroup| {
                tracing::debug!(document = label, "workgroup key opened");
                unwrap_document_key(
                    self.provider,
                    &document.secret_key,
                    &workgroup,
                    &format!("secret_key of document {label} (via workgroup)"),
                )
            }),
            None => unwrap_document_key(
                self.provider,
                &document.secret_key,
                private_key,
                &format!("secret_key of document {label}"),
            ),
        };

        if let Err(e) = &result {
            tracing::warn!(document = label, error = %e, "document key resolution failed");
        }
        result
    }

    /// Read a public document's key from `filekey`. Needs no private key.
    pub fn resolve_public(document: &Document) -> Result<DocumentKey> {
        let context = format!("filekey of public document {}", document.label());
        let filekey = document.filekey.as_deref().ok_or_else(|| {
            PermsError::decryption(&context, CoreError::DecodingError("filekey missing".into()))
        })?;
        DocumentKey::from_hex(filekey).map_err(|e| {
            PermsError::decryption(&context, CoreError::DecodingError(e.to_string()))
        })
    }
}
