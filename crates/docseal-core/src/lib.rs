//! # DocSeal Core
//!
//! Pure primitives for DocSeal: key types, the crypto provider interface,
//! sealed key envelopes, the file cipher, and the document model.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`PrivateKey`] / [`PublicKey`] - A party's key pair (X25519 for envelopes,
//!   Ed25519 for signatures, both derived from one 32-byte seed)
//! - [`CryptoProvider`] - The primitive operations consumed by the higher layers
//! - [`SealedEnvelope`] - A secret encrypted from one key pair to another
//! - [`Document`] / [`Entity`] - The stored document as read back from a server
//!
//! ## Cipher
//!
//! File bodies are protected by encrypt-then-MAC. See the [`cipher`] module.

pub mod cipher;
pub mod crypto;
pub mod document;
pub mod envelope;
pub mod error;
pub mod types;

pub use crypto::{
    CryptoProvider, Ed25519PublicKey, Ed25519Signature, PrivateKey, PublicKey, Sha256Hash,
    StandardCrypto,
};
pub use document::Document;
pub use envelope::SealedEnvelope;
pub use error::{CoreError, Result};
pub use types::{Entity, EntityId};
