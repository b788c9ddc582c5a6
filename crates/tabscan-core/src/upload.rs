//! Transient storage for uploaded images.
//!
//! Each upload lands in the configured directory under a collision-free
//! filename and is deleted again when its [`UploadedImage`] guard drops, on
//! every exit path.

use crate::error::UploadError;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use uuid::Uuid;

/// Writes uploads into a designated directory.
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`, creating the directory if absent.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, UploadError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Persist one uploaded file and return its scoped handle.
    ///
    /// The stored filename is a random UUID prefix joined with the sanitized
    /// client-supplied name, so concurrent uploads of the same file never
    /// collide.
    pub async fn save(
        &self,
        original_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<UploadedImage, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::EmptyFile);
        }

        let filename = format!("{}-{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = self.dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        tracing::debug!("Stored upload at {} ({} bytes)", path.display(), bytes.len());

        Ok(UploadedImage {
            path,
            mime_type: mime_type.to_string(),
            received_at: SystemTime::now(),
        })
    }
}

/// A stored upload, owned by one request lifecycle.
///
/// Dropping the handle removes the file from disk.
#[derive(Debug)]
pub struct UploadedImage {
    path: PathBuf,
    mime_type: String,
    received_at: SystemTime,
}

impl UploadedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn received_at(&self) -> SystemTime {
        self.received_at
    }
}

impl Drop for UploadedImage {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove upload {}: {e}", self.path.display());
        }
    }
}

/// Strip path components and shell-hostile characters from a client-supplied
/// filename.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Guess a MIME type from a filename extension, defaulting to JPEG.
pub fn mime_for_filename(name: &str) -> &'static str {
    let extension = name.rsplit('.').next().unwrap_or_default().to_lowercase();
    match extension.as_str() {
        "jpeg" | "jpg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        other => {
            tracing::warn!("Unknown image extension '{other}', defaulting to image/jpeg");
            "image/jpeg"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_writes_file_with_unique_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let image = store
            .save("tablet1.jpg", "image/jpeg", b"fake jpeg bytes")
            .await
            .unwrap();

        assert!(image.path().exists());
        let filename = image.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(filename.ends_with("-tablet1.jpg"));
        // UUID prefix is 36 chars plus the joining dash
        assert_eq!(filename.len(), 36 + 1 + "tablet1.jpg".len());
        assert_eq!(image.mime_type(), "image/jpeg");
    }

    #[tokio::test]
    async fn test_same_name_uploads_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let first = store.save("pill.png", "image/png", b"one").await.unwrap();
        let second = store.save("pill.png", "image/png", b"two").await.unwrap();
        assert_ne!(first.path(), second.path());
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let image = store.save("tablet.jpg", "image/jpeg", b"bytes").await.unwrap();
        let path = image.path().to_path_buf();
        assert!(path.exists());

        drop(image);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path()).unwrap();

        let err = store.save("tablet.jpg", "image/jpeg", b"").await.unwrap_err();
        assert!(matches!(err, UploadError::EmptyFile));
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");
        assert!(!nested.exists());
        UploadStore::new(&nested).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_filename("my photo.jpg"), "my_photo.jpg");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
    }

    #[test]
    fn test_mime_for_filename() {
        assert_eq!(mime_for_filename("a.JPG"), "image/jpeg");
        assert_eq!(mime_for_filename("a.png"), "image/png");
        assert_eq!(mime_for_filename("a.webp"), "image/webp");
        assert_eq!(mime_for_filename("mystery.bin"), "image/jpeg");
    }
}
