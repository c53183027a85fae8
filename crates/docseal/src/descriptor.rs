//! Build outputs, handed to the transport layer as JSON.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use docseal_perms::ParticipantRecord;

use crate::error::{DocError, Result};

/// Everything the server needs to store a new document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub description: String,

    pub participants: Vec<ParticipantRecord>,

    /// Encrypted file body, base64.
    pub content: String,

    /// SHA-256 of the plaintext file, hex.
    pub raw_hash: String,

    /// SHA-256 of `raw_hash`'s bytes, hex.
    pub hash: String,

    pub filename: String,

    pub mime_type: String,
}

impl CreateDescriptor {
    /// The encrypted file body.
    pub fn content_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.content)
            .map_err(|e| DocError::InvalidDocument(format!("content is not base64: {e}")))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A delta against an existing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub participants: Vec<ParticipantRecord>,
}

impl UpdateDescriptor {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub(crate) fn encode_content(ciphertext: &[u8]) -> String {
    STANDARD.encode(ciphertext)
}
