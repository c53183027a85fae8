//! # DocSeal Testkit
//!
//! Testing utilities for DocSeal.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: parties with keys, workgroups, and stored documents
//! - **Requesters**: key requesters that count calls or always fail
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust
//! use docseal_perms::{DocumentKey, DocumentKeyResolver};
//! use docseal_core::StandardCrypto;
//! use docseal_testkit::fixtures::{sealed_document, Party};
//!
//! let owner = Party::new("owner");
//! let key = DocumentKey::from_bytes([1; 32]);
//! let document = sealed_document("doc-1", &owner, &key);
//!
//! let resolved = DocumentKeyResolver::new(&StandardCrypto)
//!     .resolve(&document, &owner.key)
//!     .unwrap();
//! assert_eq!(resolved.as_bytes(), key.as_bytes());
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use docseal_testkit::generators::{document_key, file_bytes};
//!
//! proptest! {
//!     #[test]
//!     fn roundtrip(key in document_key(), bytes in file_bytes(1024)) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod requesters;

pub use fixtures::{multi_party, public_document, sealed_document, workgroup_document, Party, Workgroup};
pub use generators::ParticipantOp;
pub use requesters::{CountingRequester, FailingRequester};
