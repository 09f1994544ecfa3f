//! Photo file storage on the local filesystem.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Saves uploaded photo bytes under the configured directory with
/// collision-free names, and removes them on photo deletion.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    upload_dir: PathBuf,
}

impl PhotoStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    /// Persist photo bytes; returns the path the database should record.
    /// The stored name is a fresh UUID with the original extension, so the
    /// client-supplied filename never touches the filesystem.
    pub async fn save(&self, original_filename: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;

        let extension = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let stored_name = format!("{}.{}", Uuid::new_v4(), extension);
        let path = self.upload_dir.join(stored_name);

        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Remove a stored file. Missing files are not an error; the database
    /// record is authoritative.
    pub async fn delete(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to delete photo file");
            }
        }
    }

    /// Read a stored file back for serving.
    pub async fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_writes_under_upload_dir_with_uuid_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());

        let path = store.save("holiday.jpg", b"not a real jpeg").await.unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(path.extension().unwrap(), "jpg");
        assert_ne!(path.file_stem().unwrap(), "holiday");
        assert_eq!(store.read(&path).await.unwrap(), b"not a real jpeg");
    }

    #[tokio::test]
    async fn delete_tolerates_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());

        let path = store.save("a.png", b"x").await.unwrap();
        store.delete(&path).await;
        store.delete(&path).await;
        assert!(store.read(&path).await.is_err());
    }
}
