//! Proptest generators for property-based testing.

use proptest::prelude::*;

use docseal_core::{Entity, EntityId, PrivateKey};
use docseal_perms::{DocumentKey, ParticipantType};

/// Generate a private key.
pub fn private_key() -> impl Strategy<Value = PrivateKey> {
    any::<[u8; 32]>().prop_map(PrivateKey::from_bytes)
}

/// Generate a document key.
pub fn document_key() -> impl Strategy<Value = DocumentKey> {
    any::<[u8; 32]>().prop_map(DocumentKey::from_bytes)
}

/// Generate an entity id.
pub fn entity_id() -> impl Strategy<Value = EntityId> {
    "[a-z][a-z0-9-]{0,15}".prop_map(EntityId::new)
}

/// Generate an entity with a fresh key.
pub fn entity() -> impl Strategy<Value = Entity> {
    (entity_id(), private_key()).prop_map(|(id, key)| Entity::new(id, key.public_key()))
}

/// Generate up to `max` entities with distinct ids.
pub fn entities(max: usize) -> impl Strategy<Value = Vec<Entity>> {
    prop::collection::btree_map(entity_id(), private_key(), 0..=max).prop_map(|map| {
        map.into_iter()
            .map(|(id, key)| Entity::new(id, key.public_key()))
            .collect()
    })
}

/// Generate file contents of at most `max_len` bytes.
pub fn file_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate an entity participant kind (not `public`).
pub fn entity_kind() -> impl Strategy<Value = ParticipantType> {
    prop_oneof![
        Just(ParticipantType::Signer),
        Just(ParticipantType::Observer),
        Just(ParticipantType::Workgroup),
    ]
}

/// One fluent call against a participant set.
#[derive(Debug, Clone)]
pub enum ParticipantOp {
    Add(ParticipantType, usize),
    Remove(ParticipantType, usize),
    SetPublic(bool),
}

/// Generate a sequence of participant calls against a pool of `pool` entities.
pub fn participant_ops(pool: usize, max_len: usize) -> impl Strategy<Value = Vec<ParticipantOp>> {
    let op = prop_oneof![
        (entity_kind(), 0..pool).prop_map(|(kind, i)| ParticipantOp::Add(kind, i)),
        (entity_kind(), 0..pool).prop_map(|(kind, i)| ParticipantOp::Remove(kind, i)),
        any::<bool>().prop_map(ParticipantOp::SetPublic),
    ];
    prop::collection::vec(op, 0..=max_len)
}
