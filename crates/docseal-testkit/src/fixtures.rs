//! Test fixtures and helpers.
//!
//! Parties with keys, workgroups, and stored documents in the shape the
//! server would return them.

use docseal_core::{Document, Entity, PrivateKey, StandardCrypto};
use docseal_perms::{wrap_document_key, wrap_private_key, DocumentKey};

/// A participant with its private key.
#[derive(Clone)]
pub struct Party {
    pub key: PrivateKey,
    pub entity: Entity,
}

impl Party {
    /// A party with a random key.
    pub fn new(id: &str) -> Self {
        Self::from_key(id, PrivateKey::generate())
    }

    /// A party with a deterministic key.
    pub fn with_seed(id: &str, seed: [u8; 32]) -> Self {
        Self::from_key(id, PrivateKey::from_bytes(seed))
    }

    fn from_key(id: &str, key: PrivateKey) -> Self {
        let entity = Entity::new(id, key.public_key());
        Self { key, entity }
    }

    pub fn entity(&self) -> Entity {
        self.entity.clone()
    }
}

/// Create `count` parties named `party-0`, `party-1`, ...
pub fn multi_party(count: usize) -> Vec<Party> {
    (0..count)
        .map(|i| {
            // X25519 clamps the low bits of byte 0, so the index starts at byte 1.
            let mut seed = [0u8; 32];
            seed[1..9].copy_from_slice(&(i as u64).to_le_bytes());
            seed[31] = 0xd5;
            Party::with_seed(&format!("party-{i}"), seed)
        })
        .collect()
}

/// A workgroup: its own key pair, administered by `admin`.
pub struct Workgroup {
    pub party: Party,
    pub admin: Party,
}

impl Workgroup {
    pub fn new(id: &str, admin: Party) -> Self {
        Self {
            party: Party::new(id),
            admin,
        }
    }

    pub fn entity(&self) -> Entity {
        self.party.entity()
    }

    /// The workgroup's private key sealed to `member`, as stored in
    /// `Document::workgroup_key`.
    pub fn key_for(&self, member: &Party) -> String {
        wrap_private_key(
            &StandardCrypto,
            &self.party.key,
            &self.admin.key,
            &member.key.public_key(),
        )
        .expect("seal workgroup key")
    }
}

/// A private document whose key is sealed directly to `owner`.
pub fn sealed_document(id: &str, owner: &Party, key: &DocumentKey) -> Document {
    Document {
        id: Some(id.to_string()),
        secret_key: wrap_document_key(&StandardCrypto, key, &owner.key, &owner.entity)
            .expect("seal document key"),
        ..Document::default()
    }
}

/// A public document carrying its key in the clear.
pub fn public_document(id: &str, key: &DocumentKey) -> Document {
    Document {
        id: Some(id.to_string()),
        public: true,
        filekey: Some(key.to_hex()),
        secret_key: String::new(),
        ..Document::default()
    }
}

/// A document shared with `workgroup`, as seen by `member`.
pub fn workgroup_document(
    id: &str,
    workgroup: &Workgroup,
    member: &Party,
    key: &DocumentKey,
) -> Document {
    Document {
        id: Some(id.to_string()),
        secret_key: wrap_document_key(
            &StandardCrypto,
            key,
            &workgroup.admin.key,
            &workgroup.party.entity,
        )
        .expect("seal document key to workgroup"),
        workgroup_key: Some(workgroup.key_for(member)),
        workgroups: vec![workgroup.entity()],
        ..Document::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docseal_perms::DocumentKeyResolver;

    #[test]
    fn test_multi_party_is_deterministic() {
        let a = multi_party(3);
        let b = multi_party(3);
        assert_eq!(a.len(), 3);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.entity.id, y.entity.id);
            assert_eq!(x.entity.public_key, y.entity.public_key);
        }
        assert_ne!(a[0].entity.public_key, a[1].entity.public_key);
    }

    #[test]
    fn test_multi_party_keys_are_distinct() {
        let parties = multi_party(10);
        for (i, x) in parties.iter().enumerate() {
            for y in &parties[i + 1..] {
                assert_ne!(x.entity.public_key, y.entity.public_key);
                assert_ne!(x.key.signing_public_key(), y.key.signing_public_key());
            }
        }

        let key = DocumentKey::from_bytes([4; 32]);
        let sealed = wrap_document_key(&StandardCrypto, &key, &parties[1].key, &parties[0].entity)
            .unwrap();
        assert!(
            docseal_perms::unwrap_document_key(&StandardCrypto, &sealed, &parties[3].key, "test")
                .is_err()
        );
    }

    #[test]
    fn test_fixture_documents_resolve() {
        let owner = Party::new("owner");
        let member = Party::new("member");
        let workgroup = Workgroup::new("legal", owner.clone());
        let key = DocumentKey::from_bytes([9; 32]);
        let resolver = DocumentKeyResolver::new(&StandardCrypto);

        let doc = sealed_document("d1", &owner, &key);
        assert_eq!(resolver.resolve(&doc, &owner.key).unwrap().as_bytes(), key.as_bytes());

        let doc = public_document("d2", &key);
        assert_eq!(resolver.resolve(&doc, &member.key).unwrap().as_bytes(), key.as_bytes());

        let doc = workgroup_document("d3", &workgroup, &member, &key);
        assert_eq!(resolver.resolve(&doc, &member.key).unwrap().as_bytes(), key.as_bytes());
    }
}
