//! The file being sealed.

use std::path::{Path, PathBuf};

use crate::error::{DocError, Result};

#[derive(Debug, Clone)]
enum Source {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// A file body plus the metadata reported alongside it.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    name: String,
    mime_type: Option<String>,
    source: Source,
}

impl DocumentFile {
    /// An in-memory file.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            source: Source::Bytes(bytes.into()),
        }
    }

    /// A file on disk, read when the document is built.
    ///
    /// The reported name is the final path component.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name,
            mime_type: None,
            source: Source::Path(path.to_path_buf()),
        }
    }

    /// Declare the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Load the body into memory, enforcing `limit` if set.
    pub async fn read(self, limit: Option<u64>) -> Result<Vec<u8>> {
        let bytes = match self.source {
            Source::Bytes(bytes) => bytes,
            Source::Path(path) => {
                if let Some(limit) = limit {
                    let metadata = tokio::fs::metadata(&path)
                        .await
                        .map_err(|source| DocError::Io {
                            path: path.clone(),
                            source,
                        })?;
                    check_size(metadata.len(), limit)?;
                }
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| DocError::Io { path, source })?
            }
        };

        if let Some(limit) = limit {
            check_size(bytes.len() as u64, limit)?;
        }
        Ok(bytes)
    }
}

fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(DocError::FileTooLarge { size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_bytes() {
        let file = DocumentFile::from_bytes("a.txt", b"hello".to_vec());
        assert_eq!(file.read(None).await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_read_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = DocumentFile::from_path(&path).with_mime_type("application/pdf");
        assert_eq!(file.name(), "contract.pdf");
        assert_eq!(file.mime_type(), Some("application/pdf"));
        assert_eq!(file.read(Some(1024)).await.unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_missing_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = DocumentFile::from_path(dir.path().join("missing.bin"));
        assert!(matches!(file.read(None).await, Err(DocError::Io { .. })));
    }

    #[tokio::test]
    async fn test_size_limit() {
        let file = DocumentFile::from_bytes("big.bin", vec![0u8; 10]);
        assert!(matches!(
            file.read(Some(9)).await,
            Err(DocError::FileTooLarge { size: 10, limit: 9 })
        ));
    }
}
