//! Physical upload storage for COBBS.
//!
//! Stored files live flat in a single upload directory under
//! collision-safe names derived by [`derive_storage_name`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::upload::derive_storage_name;
use crate::{CobbsError, Result};

/// File storage service for uploaded files.
#[derive(Debug, Clone)]
pub struct UploadStorage {
    /// Upload directory.
    dir: PathBuf,
}

impl UploadStorage {
    /// Create a new UploadStorage rooted at the given directory.
    ///
    /// The directory will be created if it doesn't exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    /// Get the upload directory of this storage.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save content under a fresh collision-safe name.
    ///
    /// Returns the stored filename.
    pub fn save(&self, content: &[u8], original_name: &str) -> Result<String> {
        let stored_name = derive_storage_name(original_name);
        fs::write(self.path_for(&stored_name), content)?;
        Ok(stored_name)
    }

    /// Load the content of a stored file.
    pub fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        match fs::read(self.path_for(stored_name)) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(CobbsError::NotFound(format!("file: {stored_name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a stored file.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist.
    pub fn delete(&self, stored_name: &str) -> Result<bool> {
        match fs::remove_file(self.path_for(stored_name)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a file exists in storage.
    pub fn exists(&self, stored_name: &str) -> bool {
        self.path_for(stored_name).exists()
    }

    /// Get the full path of a stored name inside the upload directory.
    fn path_for(&self, stored_name: &str) -> PathBuf {
        self.dir.join(stored_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, UploadStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = UploadStorage::new(temp_dir.path()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("uploads");

        assert!(!dir.exists());
        let storage = UploadStorage::new(&dir).unwrap();
        assert!(dir.exists());
        assert_eq!(storage.dir(), dir);
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, storage) = setup_storage();
        let content = b"picture bytes";

        let stored_name = storage.save(content, "wallet.png").unwrap();
        assert!(stored_name.ends_with("_wallet.png"));

        let loaded = storage.load(&stored_name).unwrap();
        assert_eq!(loaded, content);
    }

    #[test]
    fn test_save_same_name_twice_keeps_both() {
        let (_temp_dir, storage) = setup_storage();

        let first = storage.save(b"one", "wallet.png").unwrap();
        let second = storage.save(b"two", "wallet.png").unwrap();

        assert_ne!(first, second);
        assert_eq!(storage.load(&first).unwrap(), b"one");
        assert_eq!(storage.load(&second).unwrap(), b"two");
    }

    #[test]
    fn test_save_sanitizes_traversal_attempts() {
        let (_temp_dir, storage) = setup_storage();

        let stored_name = storage.save(b"data", "../../etc/passwd").unwrap();
        assert!(!stored_name.contains(".."));

        // The file landed inside the upload directory
        assert!(storage.exists(&stored_name));
        assert!(storage.dir().join(&stored_name).is_file());
    }

    #[test]
    fn test_load_not_found() {
        let (_temp_dir, storage) = setup_storage();
        let result = storage.load("nonexistent.txt");
        assert!(matches!(result, Err(CobbsError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = setup_storage();

        let stored_name = storage.save(b"to delete", "delete.png").unwrap();
        assert!(storage.exists(&stored_name));

        assert!(storage.delete(&stored_name).unwrap());
        assert!(!storage.exists(&stored_name));

        // Deleting again returns false
        assert!(!storage.delete(&stored_name).unwrap());
    }

    #[test]
    fn test_binary_content() {
        let (_temp_dir, storage) = setup_storage();

        let content: Vec<u8> = (0..=255).collect();
        let stored_name = storage.save(&content, "binary.pdf").unwrap();
        assert_eq!(storage.load(&stored_name).unwrap(), content);
    }
}
