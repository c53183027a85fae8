//! # DocSeal Permissions
//!
//! Document keys, participant management, and key resolution.
//!
//! ## Encryption Model
//!
//! Each document uses a two-layer key model:
//!
//! 1. **Document Key**: a 32-byte symmetric key that encrypts the file body
//! 2. **Sealed Keys**: the document key is sealed to every participant's
//!    X25519 public key, or published in the clear for public documents
//!
//! Workgroups add one level of indirection: the document key is sealed to
//! the workgroup, and the workgroup's private key is sealed to each member.
//! Membership changes never touch the documents.
//!
//! Removing a participant stops future access at the server only. A key
//! that was already delivered cannot be taken back.
//!
//! ## Usage
//!
//! ```rust
//! use docseal_core::{Entity, PrivateKey, StandardCrypto};
//! use docseal_perms::{DocumentKey, FileCipher, ParticipantSet, ParticipantType};
//!
//! let owner = PrivateKey::generate();
//! let reader = PrivateKey::generate();
//! let key = DocumentKey::generate(&StandardCrypto).unwrap();
//!
//! let ciphertext = FileCipher::new(&StandardCrypto).encrypt(b"contract", &key).unwrap();
//!
//! let mut participants = ParticipantSet::for_create();
//! participants.add(ParticipantType::Observer, Entity::new("reader", reader.public_key()));
//! let records = participants
//!     .resolve(&StandardCrypto, Some(&key), Some(&owner))
//!     .unwrap();
//! assert_eq!(records.len(), 1);
//! # let _ = ciphertext;
//! ```

pub mod cipher;
pub mod crypto;
pub mod diff;
pub mod error;
pub mod keyshare;
pub mod participant;
pub mod resolver;

pub use cipher::FileCipher;
pub use crypto::{DocumentKey, DOCUMENT_KEY_LEN};
pub use diff::{diff_by, Diff, ParticipantDiff};
pub use error::{PermsError, Result};
pub use keyshare::{unwrap_document_key, unwrap_private_key, wrap_document_key, wrap_private_key};
pub use participant::{
    Action, Baseline, Participant, ParticipantRecord, ParticipantSet, ParticipantType,
};
pub use resolver::DocumentKeyResolver;
