//! Keystore byte-buffer storage
//!
//! The codec never touches storage itself: a keystore is read as one buffer
//! and every mutation writes one complete replacement buffer.

use crate::errors::{KeyringError, Result};
use crate::security::SecureBytes;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::debug;

/// A source and sink for a whole keystore buffer
pub trait KeystoreStorage: Send + Sync {
    /// Whether a keystore has been created
    fn exists(&self) -> Result<bool>;

    /// Read the current buffer
    fn read(&self) -> Result<SecureBytes>;

    /// Replace the stored buffer wholesale
    fn write(&self, data: &[u8]) -> Result<()>;
}

/// In-memory storage, mostly for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: RwLock<Option<SecureBytes>>,
}

impl MemoryStorage {
    /// Create storage with no keystore yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage already holding `data`
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(SecureBytes::new(data))),
        }
    }
}

fn poisoned<T>(_: T) -> KeyringError {
    KeyringError::StorageError("storage lock poisoned".to_string())
}

impl KeystoreStorage for MemoryStorage {
    fn exists(&self) -> Result<bool> {
        Ok(self.data.read().map_err(poisoned)?.is_some())
    }

    fn read(&self) -> Result<SecureBytes> {
        self.data
            .read()
            .map_err(poisoned)?
            .clone()
            .ok_or(KeyringError::KeystoreNotFound)
    }

    fn write(&self, data: &[u8]) -> Result<()> {
        let mut guard = self.data.write().map_err(poisoned)?;
        *guard = Some(SecureBytes::from(data));
        Ok(())
    }
}

/// Storage backed by a single file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create file storage at the given path
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeystoreStorage for FileStorage {
    fn exists(&self) -> Result<bool> {
        Ok(self.path.is_file())
    }

    fn read(&self) -> Result<SecureBytes> {
        if !self.path.is_file() {
            return Err(KeyringError::KeystoreNotFound);
        }
        let data = fs::read(&self.path)?;
        debug!("Read {} bytes from {:?}", data.len(), self.path);
        Ok(SecureBytes::new(data))
    }

    fn write(&self, data: &[u8]) -> Result<()> {
        // Write beside the target then rename, so readers never see a partial buffer
        let staging = self.staging_path();
        fs::write(&staging, data)?;
        fs::rename(&staging, &self.path)?;
        debug!("Wrote {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }
}
