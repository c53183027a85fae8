//! Builder configuration.

/// MIME type used when a file does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Configuration shared by the document builders.
#[derive(Debug, Clone)]
pub struct DocSealConfig {
    /// MIME type reported for files that do not declare one.
    pub default_mime_type: String,
    /// Largest file body accepted for encryption, in bytes.
    pub max_file_size: Option<u64>,
}

impl Default for DocSealConfig {
    fn default() -> Self {
        Self {
            default_mime_type: DEFAULT_MIME_TYPE.to_string(),
            max_file_size: None,
        }
    }
}

impl DocSealConfig {
    /// Reject files larger than `limit` bytes.
    pub fn with_max_file_size(mut self, limit: u64) -> Self {
        self.max_file_size = Some(limit);
        self
    }
}
