//! Sealed envelopes via X25519 key agreement.
//!
//! A secret (a document key, or a workgroup's private key) is sealed from a
//! sender's static key pair to a receiver's public key. The sender's public
//! key travels with the envelope so the receiver can derive the same shared
//! secret; the derived wrap key is bound to both public keys.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::crypto::{PrivateKey, PublicKey};
use crate::error::{CoreError, Result};

const WRAP_CONTEXT: &str = "docseal-v1-envelope-wrap";

/// An envelope sealed from one key pair to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedEnvelope {
    /// Sender's X25519 public key (sender's side of ECDH).
    pub sender_public: PublicKey,

    /// Nonce used for encryption.
    pub nonce: [u8; 12],

    /// The sealed secret (includes authentication tag).
    pub ciphertext: Vec<u8>,
}

impl SealedEnvelope {
    /// Seal `plaintext` from `sender` to `receiver`.
    pub fn seal(plaintext: &[u8], sender: &PrivateKey, receiver: &PublicKey) -> Result<Self> {
        let sender_public = sender.public_key();
        let wrap_key = derive_wrap_key(sender, receiver, &sender_public, receiver)
            .map_err(|e| CoreError::EncryptionFailed(e.to_string()))?;

        let mut nonce = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut nonce);

        let ciphertext = wrap_key
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|e| CoreError::EncryptionFailed(e.to_string()))?;

        Ok(Self {
            sender_public,
            nonce,
            ciphertext,
        })
    }

    /// Open the envelope with the receiver's private key.
    pub fn open(&self, receiver: &PrivateKey) -> Result<Vec<u8>> {
        let receiver_public = receiver.public_key();
        let wrap_key = derive_wrap_key(
            receiver,
            &self.sender_public,
            &self.sender_public,
            &receiver_public,
        )?;

        wrap_key
            .decrypt(Nonce::from_slice(&self.nonce), self.ciphertext.as_slice())
            .map_err(|_| {
                CoreError::DecryptionFailed("envelope open failed (wrong key or tampered data)".into())
            })
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    ///
    /// Malformed input is reported as [`CoreError::DecryptionFailed`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes)
            .map_err(|e| CoreError::DecryptionFailed(format!("malformed envelope: {e}")))
    }
}

/// Derive the symmetric wrap key for `local` talking to `peer`.
///
/// `sender_public` and `receiver_public` fix the transcript order so both
/// sides hash the same bytes.
fn derive_wrap_key(
    local: &PrivateKey,
    peer: &PublicKey,
    sender_public: &PublicKey,
    receiver_public: &PublicKey,
) -> Result<ChaCha20Poly1305> {
    let shared = local.static_secret().diffie_hellman(&peer.to_dalek());
    if !shared.was_contributory() {
        return Err(CoreError::DecryptionFailed(
            "non-contributory key agreement".into(),
        ));
    }

    let mut hasher = blake3::Hasher::new_derive_key(WRAP_CONTEXT);
    hasher.update(shared.as_bytes());
    hasher.update(sender_public.as_bytes());
    hasher.update(receiver_public.as_bytes());
    let key = hasher.finalize();

    ChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|e| CoreError::EncryptionFailed(e.to_string()))
}
