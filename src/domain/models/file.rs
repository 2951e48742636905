use std::fmt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use image::ImageFormat;
use thiserror::Error;
use uuid::Uuid;

/// Identity of one user selection. Every selection gets a fresh id, even when
/// the same file is picked twice, so in-flight responses can be matched to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl FileId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not an image")]
    NotAnImage(String),

    #[error("{0} is empty")]
    Empty(String),
}

#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub id: FileId,
    pub content: Bytes,
    pub filename: String,
    pub mime_type: String,
    pub selected_at: DateTime<Utc>,
}

impl SelectedFile {
    pub fn new(
        content: impl Into<Bytes>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: FileId::new(),
            content: content.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            selected_at: Utc::now(),
        }
    }

    /// Reads an image from disk. Only files whose extension maps to a known
    /// image format are accepted.
    pub async fn load(path: &Path) -> Result<Self, SelectionError> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mime_type = ImageFormat::from_path(path)
            .map_err(|_| SelectionError::NotAnImage(filename.clone()))?
            .to_mime_type();

        let content = tokio::fs::read(path)
            .await
            .map_err(|source| SelectionError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        if content.is_empty() {
            return Err(SelectionError::Empty(filename));
        }

        Ok(Self::new(content, filename, mime_type))
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_selection_gets_a_distinct_id() {
        let first = SelectedFile::new(vec![1u8], "a.png", "image/png");
        let second = SelectedFile::new(vec![1u8], "a.png", "image/png");

        assert_ne!(first.id, second.id);
        assert_eq!(first.size(), 1);
    }

    #[tokio::test]
    async fn load_reads_image_and_derives_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.PNG");
        std::fs::write(&path, b"\x89PNG fake").unwrap();

        let file = SelectedFile::load(&path).await.unwrap();

        assert_eq!(file.filename, "scan.PNG");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.content.as_ref(), b"\x89PNG fake");
    }

    #[tokio::test]
    async fn load_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let err = SelectedFile::load(&path).await.unwrap_err();

        assert!(matches!(err, SelectionError::NotAnImage(name) if name == "notes.txt"));
    }

    #[tokio::test]
    async fn load_rejects_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.jpg");
        std::fs::write(&path, b"").unwrap();

        let err = SelectedFile::load(&path).await.unwrap_err();

        assert!(matches!(err, SelectionError::Empty(_)));
    }

    #[tokio::test]
    async fn load_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.jpeg");

        let err = SelectedFile::load(&path).await.unwrap_err();

        assert!(matches!(err, SelectionError::Io { .. }));
    }
}
