//! The stored document, as read back from the server.
//!
//! Update and decrypt flows read this to recover the document key and to
//! diff participant lists. Key material is carried as hex-encoded sealed
//! envelopes (see [`crate::envelope`]).

use serde::{Deserialize, Serialize};

use crate::types::{Entity, EntityId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Server id, used for error context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub public: bool,

    /// Document key in the clear (hex). Present only when `public`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filekey: Option<String>,

    /// Document key sealed to the current user or to their workgroup (hex).
    #[serde(default)]
    pub secret_key: String,

    /// The workgroup's private key sealed to the current user (hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workgroup_key: Option<String>,

    #[serde(default)]
    pub observers: Vec<Entity>,

    #[serde(default)]
    pub workgroups: Vec<Entity>,

    /// SHA-256 of the plaintext file (hex).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_hash: Option<String>,
}

impl Document {
    /// A label for log lines and error context.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<unsaved>")
    }

    /// Whether `id` is among the document's observers.
    pub fn has_observer(&self, id: &EntityId) -> bool {
        self.observers.iter().any(|e| &e.id == id)
    }

    /// Whether `id` is among the document's workgroups.
    pub fn has_workgroup(&self, id: &EntityId) -> bool {
        self.workgroups.iter().any(|e| &e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PublicKey;

    #[test]
    fn test_parse_server_document() {
        let json = r#"{
            "id": "doc-1",
            "public": false,
            "secret_key": "aabb",
            "workgroup_key": null,
            "observers": [{"id": "u1", "public_key": "0101010101010101010101010101010101010101010101010101010101010101"}],
            "workgroups": []
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.label(), "doc-1");
        assert!(!doc.public);
        assert!(doc.workgroup_key.is_none());
        assert!(doc.has_observer(&EntityId::new("u1")));
        assert!(!doc.has_workgroup(&EntityId::new("u1")));
        assert_eq!(doc.observers[0].public_key, PublicKey::from_bytes([1; 32]));
    }

    #[test]
    fn test_label_for_unsaved_document() {
        assert_eq!(Document::default().label(), "<unsaved>");
    }
}
