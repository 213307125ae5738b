//! Filesystem-backed blob storage for knowledge-base uploads.
//!
//! Files live under `{root}/{business_id}/`. Same-named uploads within a
//! business are kept apart by a numeric suffix before the extension
//! (`menu.pdf`, `menu_1.pdf`, ...).

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::StorageError;

pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn business_dir(&self, business_id: Uuid) -> PathBuf {
        self.root.join(business_id.to_string())
    }

    /// Write `content` under the business directory and return the storage
    /// path. Picks the first free `{stem}_{n}{ext}` name on collision.
    pub async fn save(
        &self,
        business_id: Uuid,
        filename: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let dir = self.business_dir(business_id);
        fs::create_dir_all(&dir).await?;

        // Only the final component is honoured; callers may hand us a
        // client-supplied name.
        let filename = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file");
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("file");
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();

        let mut target = dir.join(filename);
        let mut counter = 1;
        while fs::try_exists(&target).await? {
            target = dir.join(format!("{stem}_{counter}{extension}"));
            counter += 1;
        }

        fs::write(&target, content).await?;
        Ok(target.to_string_lossy().into_owned())
    }

    /// Read a stored file. `None` when the path does not exist.
    pub async fn read(&self, path: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file. Idempotent: a missing path is `Ok(false)`.
    pub async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
