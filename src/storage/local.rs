//! Local filesystem byte store
//!
//! Keys are relative paths under a base directory. Writes never replace an
//! existing object; callers that need fresh objects must choose fresh keys.

use std::path::{Component, Path, PathBuf};

use super::types::{ObjectMetadata, StorageError};

/// A directory-rooted byte store
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed
    pub async fn open(base_path: PathBuf) -> Result<Self, StorageError> {
        tokio::fs::create_dir_all(&base_path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;
        Ok(Self { base_path })
    }

    /// Base directory of the store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a key to an on-disk path, rejecting traversal outside the base
    fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(key);
        if key.is_empty()
            || !relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(relative))
    }

    /// Read the full contents of an object
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    /// Write a new object; fails if the key is already taken
    pub async fn write(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }

        if tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?
        {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Check whether an object exists
    pub async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let path = self.resolve(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    /// Remove an object. Missing objects are not an error.
    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    /// List objects at the top level of the store
    pub async fn list(&self) -> Result<Vec<ObjectMetadata>, StorageError> {
        let mut objects = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.base_path)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?
        {
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
            if !metadata.is_file() {
                continue;
            }
            objects.push(ObjectMetadata {
                key: entry.file_name().to_string_lossy().to_string(),
                size: metadata.len(),
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}

// ============================================================================
// Tests
// ============================================================================
