//! # DocSeal
//!
//! Multi-recipient envelope encryption for shared documents.
//!
//! ## Overview
//!
//! A document's file body is encrypted once under a random 32-byte document
//! key. The key is then sealed separately to every participant:
//!
//! - **Signers** and **observers** get the key sealed to their public key
//! - **Workgroups** get the key sealed to the workgroup, whose own private
//!   key is sealed to each member
//! - **Public** documents publish the key in the clear
//!
//! Creating a document produces a [`CreateDescriptor`] with the ciphertext,
//! hashes, and sealed keys. Updating one produces an [`UpdateDescriptor`]
//! holding only the participant changes. Both are JSON-serializable and
//! handed to whatever transport stores them.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use docseal::{DocSeal, DocSealConfig, DocumentFile, StaticKey};
//! use docseal::core::{Entity, PrivateKey};
//!
//! async fn example() -> docseal::Result<()> {
//!     let me = PrivateKey::generate();
//!     let alice = Entity::new("alice", PrivateKey::generate().public_key());
//!
//!     let seal = DocSeal::new(DocSealConfig::default())
//!         .with_key_requester(Arc::new(StaticKey::new(me)));
//!
//!     let descriptor = seal
//!         .create()
//!         .title("Lease")
//!         .file(DocumentFile::from_path("lease.pdf").with_mime_type("application/pdf"))
//!         .add_signer(alice)
//!         .build()
//!         .await?;
//!
//!     println!("{}", descriptor.to_json().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `docseal::core` - keys, crypto provider, stored document model
//! - `docseal::perms` - document keys, participants, key resolution

pub mod builder;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod file;
pub mod requester;
pub mod seal;

pub use builder::{Create, CreateDocument, DocumentBuilder, Flow, Update, UpdateDocument};
pub use config::{DocSealConfig, DEFAULT_MIME_TYPE};
pub use descriptor::{CreateDescriptor, UpdateDescriptor};
pub use error::{DocError, Result};
pub use file::DocumentFile;
pub use requester::{FnRequester, KeyRequester, StaticKey};
pub use seal::DocSeal;

pub use docseal_core as core;
pub use docseal_perms as perms;
