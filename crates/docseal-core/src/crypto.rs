//! Cryptographic primitives for DocSeal.
//!
//! Wraps SHA-256 hashing, Ed25519 signing and X25519 key agreement with
//! strong types, and defines the [`CryptoProvider`] interface the higher
//! layers consume.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use x25519_dalek::StaticSecret;

use crate::cipher;
use crate::envelope;
use crate::error::{CoreError, Result};

/// Decode a hex string into a fixed-size array.
fn decode_array<const N: usize>(s: &str) -> std::result::Result<[u8; N], hex::FromHexError> {
    let bytes = hex::decode(s)?;
    bytes
        .try_into()
        .map_err(|_| hex::FromHexError::InvalidStringLength)
}

/// A 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sha256Hash(pub [u8; 32]);

impl Sha256Hash {
    /// Compute the SHA-256 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        decode_array(s).map(Self)
    }
}

impl fmt::Debug for Sha256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha256({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Sha256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A 32-byte X25519 public key, the receiving side of a sealed envelope.
///
/// Serialized as a lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        decode_array(s).map(Self)
    }

    pub(crate) fn to_dalek(self) -> x25519_dalek::PublicKey {
        x25519_dalek::PublicKey::from(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl From<PublicKey> for String {
    fn from(pk: PublicKey) -> Self {
        pk.to_hex()
    }
}

impl TryFrom<String> for PublicKey {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s).map_err(|e| CoreError::InvalidPublicKey(e.to_string()))
    }
}

/// A 32-byte Ed25519 public key, used to verify document signatures.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        decode_array(s).map(Self)
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<()> {
        let verifying_key = VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CoreError::InvalidPublicKey(e.to_string()))?;

        let sig = Signature::from_bytes(&signature.0);

        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

/// A 64-byte Ed25519 signature.
///
/// Serialized as a lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> std::result::Result<Self, hex::FromHexError> {
        decode_array(s).map(Self)
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

impl From<Ed25519Signature> for String {
    fn from(sig: Ed25519Signature) -> Self {
        sig.to_hex()
    }
}

impl TryFrom<String> for Ed25519Signature {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s).map_err(|e| CoreError::DecodingError(e.to_string()))
    }
}

/// A party's private key.
///
/// One 32-byte seed backs both halves of the identity: it is used directly
/// as the X25519 static secret for envelopes and as the Ed25519 signing seed.
#[derive(Clone)]
pub struct PrivateKey([u8; 32]);

impl PrivateKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from a 32-byte seed.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, which must be exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            CoreError::InvalidPrivateKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        decode_array(s)
            .map(Self)
            .map_err(|e| CoreError::InvalidPrivateKey(e.to_string()))
    }

    /// Get the raw seed bytes (secret key material).
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The X25519 public key other parties seal envelopes to.
    pub fn public_key(&self) -> PublicKey {
        let public = x25519_dalek::PublicKey::from(&self.static_secret());
        PublicKey(*public.as_bytes())
    }

    /// The Ed25519 public key that verifies this key's signatures.
    pub fn signing_public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key().verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.signing_key().sign(message).to_bytes())
    }

    pub(crate) fn static_secret(&self) -> StaticSecret {
        StaticSecret::from(self.0)
    }

    fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.0)
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({:?})", self.public_key())
    }
}

/// Primitive operations consumed by key resolution and the document builders.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait CryptoProvider: Send + Sync {
    /// SHA-256 of `data`.
    fn hash(&self, data: &[u8]) -> Sha256Hash;

    /// `len` bytes from a cryptographically secure source.
    fn random_bytes(&self, len: usize) -> Vec<u8>;

    /// Seal `plaintext` from `sender` to `receiver`.
    fn envelope_encrypt(
        &self,
        plaintext: &[u8],
        sender: &PrivateKey,
        receiver: &PublicKey,
    ) -> Result<Vec<u8>>;

    /// Open an envelope addressed to `receiver`.
    ///
    /// When `sender` is given, the envelope must have been sealed by it.
    /// Fails with [`CoreError::DecryptionFailed`] on any authentication failure.
    fn envelope_decrypt(
        &self,
        envelope: &[u8],
        receiver: &PrivateKey,
        sender: Option<&PublicKey>,
    ) -> Result<Vec<u8>>;

    /// Authenticated symmetric encryption.
    fn symmetric_encrypt(&self, plaintext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>>;

    /// Authenticated symmetric decryption.
    ///
    /// Fails with [`CoreError::InvalidChecksum`] when the tag does not match.
    fn symmetric_decrypt(&self, ciphertext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>>;

    /// Sign a digest.
    fn sign(&self, digest: &[u8], key: &PrivateKey) -> Ed25519Signature;

    /// Verify a signature over a digest.
    fn verify(&self, digest: &[u8], signature: &Ed25519Signature, key: &Ed25519PublicKey) -> bool;
}

/// The default provider: SHA-256, X25519 + ChaCha20-Poly1305 envelopes,
/// ChaCha20 + keyed BLAKE3 file cipher, Ed25519 signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCrypto;

impl CryptoProvider for StandardCrypto {
    fn hash(&self, data: &[u8]) -> Sha256Hash {
        Sha256Hash::hash(data)
    }

    fn random_bytes(&self, len: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; len];
        rand::thread_rng().fill_bytes(&mut bytes);
        bytes
    }

    fn envelope_encrypt(
        &self,
        plaintext: &[u8],
        sender: &PrivateKey,
        receiver: &PublicKey,
    ) -> Result<Vec<u8>> {
        envelope::SealedEnvelope::seal(plaintext, sender, receiver)?.to_bytes()
    }

    fn envelope_decrypt(
        &self,
        envelope: &[u8],
        receiver: &PrivateKey,
        sender: Option<&PublicKey>,
    ) -> Result<Vec<u8>> {
        let sealed = envelope::SealedEnvelope::from_bytes(envelope)?;
        if let Some(expected) = sender {
            if sealed.sender_public != *expected {
                return Err(CoreError::DecryptionFailed(format!(
                    "envelope sealed by {:?}, expected {:?}",
                    sealed.sender_public, expected
                )));
            }
        }
        sealed.open(receiver)
    }

    fn symmetric_encrypt(&self, plaintext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>> {
        Ok(cipher::encrypt(plaintext, key))
    }

    fn symmetric_decrypt(&self, ciphertext: &[u8], key: &[u8; 32]) -> Result<Vec<u8>> {
        cipher::decrypt(ciphertext, key)
    }

    fn sign(&self, digest: &[u8], key: &PrivateKey) -> Ed25519Signature {
        key.sign(digest)
    }

    fn verify(&self, digest: &[u8], signature: &Ed25519Signature, key: &Ed25519PublicKey) -> bool {
        key.verify(digest, signature).is_ok()
    }
}
