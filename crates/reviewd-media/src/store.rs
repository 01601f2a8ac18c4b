//! Local-disk media storage.
//!
//! Files are written under a single uploads directory and served back by the
//! HTTP layer under `/uploads/{filename}`. A remote media host would slot in
//! here as an alternative store; only local disk is implemented.

use std::path::{Path, PathBuf};

use crate::MediaError;

/// Stores media files on the local filesystem under one directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Creates the store, making sure the uploads directory exists.
    ///
    /// `base_url` is the public origin (no trailing slash) used to build the
    /// URLs handed back to clients.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Io`] if the directory cannot be created.
    pub async fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Result<Self, MediaError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            base_url: base_url.into(),
        })
    }

    /// Writes the file and returns its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Io`] if the write fails.
    pub async fn put(&self, filename: &str, bytes: &[u8]) -> Result<String, MediaError> {
        let path = self.root.join(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(format!("{}/uploads/{filename}", self.base_url))
    }

    /// Removes a stored file. Used to roll back a partially persisted batch;
    /// a file that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::Io`] on any failure other than the file being absent.
    pub async fn remove(&self, filename: &str) -> Result<(), MediaError> {
        match tokio::fs::remove_file(self.root.join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::Io(e)),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("reviewd-media-test-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn put_writes_bytes_and_returns_public_url() {
        let dir = scratch_dir();
        let store = LocalStore::new(&dir, "http://localhost:3000")
            .await
            .expect("store");

        let url = store.put("abc.png", b"fake-png").await.expect("put");
        assert_eq!(url, "http://localhost:3000/uploads/abc.png");

        let on_disk = tokio::fs::read(dir.join("abc.png")).await.expect("read back");
        assert_eq!(on_disk, b"fake-png");

        tokio::fs::remove_dir_all(&dir).await.expect("cleanup");
    }

    #[tokio::test]
    async fn remove_is_a_no_op_for_missing_files() {
        let dir = scratch_dir();
        let store = LocalStore::new(&dir, "http://localhost:3000")
            .await
            .expect("store");

        store.remove("never-existed.png").await.expect("remove absent");

        store.put("gone.png", b"x").await.expect("put");
        store.remove("gone.png").await.expect("remove present");
        assert!(!dir.join("gone.png").exists());

        tokio::fs::remove_dir_all(&dir).await.expect("cleanup");
    }
}
