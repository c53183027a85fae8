//! Sharing keys with participants.
//!
//! The document key is sealed from the builder's private key to each
//! participant's public key and hex-encoded for transport. A workgroup's own
//! private key is shared with its members the same way, which gives the
//! two-level indirection used by [`crate::resolver`].

use docseal_core::{CryptoProvider, Entity, PrivateKey, PublicKey};

use crate::crypto::DocumentKey;
use crate::error::{PermsError, Result};

/// Seal `document_key` for `recipient`, returning hex.
pub fn wrap_document_key(
    provider: &dyn CryptoProvider,
    document_key: &DocumentKey,
    sender: &PrivateKey,
    recipient: &Entity,
) -> Result<String> {
    let sealed = provider
        .envelope_encrypt(document_key.as_bytes(), sender, &recipient.public_key)
        .map_err(|source| PermsError::KeyWrap {
            participant: recipient.id.clone(),
            source,
        })?;
    Ok(hex::encode(sealed))
}

/// Open a hex-encoded sealed document key.
///
/// `context` names what is being opened, for error messages.
pub fn unwrap_document_key(
    provider: &dyn CryptoProvider,
    sealed_hex: &str,
    receiver: &PrivateKey,
    context: &str,
) -> Result<DocumentKey> {
    let plaintext = open_hex(provider, sealed_hex, receiver, context)?;
    DocumentKey::from_slice(&plaintext).map_err(|e| {
        PermsError::decryption(context, docseal_core::CoreError::DecodingError(e.to_string()))
    })
}

/// Seal a workgroup's private key for one of its members, returning hex.
pub fn wrap_private_key(
    provider: &dyn CryptoProvider,
    key: &PrivateKey,
    sender: &PrivateKey,
    recipient: &PublicKey,
) -> Result<String> {
    let sealed = provider.envelope_encrypt(key.as_bytes(), sender, recipient)?;
    Ok(hex::encode(sealed))
}

/// Open a hex-encoded sealed private key.
pub fn unwrap_private_key(
    provider: &dyn CryptoProvider,
    sealed_hex: &str,
    receiver: &PrivateKey,
    context: &str,
) -> Result<PrivateKey> {
    let plaintext = open_hex(provider, sealed_hex, receiver, context)?;
    PrivateKey::from_slice(&plaintext).map_err(|e| PermsError::decryption(context, e))
}

fn open_hex(
    provider: &dyn CryptoProvider,
    sealed_hex: &str,
    receiver: &PrivateKey,
    context: &str,
) -> Result<Vec<u8>> {
    let sealed = hex::decode(sealed_hex).map_err(|e| {
        PermsError::decryption(context, docseal_core::CoreError::DecodingError(e.to_string()))
    })?;
    provider
        .envelope_decrypt(&sealed, receiver, None)
        .map_err(|e| PermsError::decryption(context, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseal_core::StandardCrypto;

    #[test]
    fn test_wrap_unwrap_document_key() {
        let owner = PrivateKey::generate();
        let reader = PrivateKey::generate();
        let entity = Entity::new("reader", reader.public_key());
        let key = DocumentKey::from_bytes([0x33; 32]);

        let wrapped = wrap_document_key(&StandardCrypto, &key, &owner, &entity).unwrap();
        let recovered =
            unwrap_document_key(&StandardCrypto, &wrapped, &reader, "test").unwrap();

        assert_eq!(key.as_bytes(), recovered.as_bytes());
    }

    #[test]
    fn test_wrong_recipient_fails() {
        let owner = PrivateKey::generate();
        let reader = PrivateKey::generate();
        let stranger = PrivateKey::generate();
        let entity = Entity::new("reader", reader.public_key());
        let key = DocumentKey::from_bytes([0x33; 32]);

        let wrapped = wrap_document_key(&StandardCrypto, &key, &owner, &entity).unwrap();
        let err = unwrap_document_key(&StandardCrypto, &wrapped, &stranger, "secret_key")
            .unwrap_err();

        match err {
            PermsError::Decryption { context, .. } => assert_eq!(context, "secret_key"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_hex_is_decryption_error() {
        let reader = PrivateKey::generate();
        assert!(matches!(
            unwrap_document_key(&StandardCrypto, "not hex", &reader, "secret_key"),
            Err(PermsError::Decryption { .. })
        ));
    }

    #[test]
    fn test_wrong_length_document_key_is_decryption_error() {
        let owner = PrivateKey::generate();
        let sealed = StandardCrypto
            .envelope_encrypt(&[0x11; 16], &owner, &owner.public_key())
            .unwrap();

        match unwrap_document_key(&StandardCrypto, &hex::encode(sealed), &owner, "secret_key") {
            Err(PermsError::Decryption { context, .. }) => assert_eq!(context, "secret_key"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_private_key_roundtrip() {
        let admin = PrivateKey::generate();
        let member = PrivateKey::generate();
        let workgroup = PrivateKey::generate();

        let wrapped =
            wrap_private_key(&StandardCrypto, &workgroup, &admin, &member.public_key()).unwrap();
        let recovered =
            unwrap_private_key(&StandardCrypto, &wrapped, &member, "workgroup_key").unwrap();

        assert_eq!(recovered.public_key(), workgroup.public_key());
    }
}
