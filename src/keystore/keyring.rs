//! Keyring service
//!
//! Drives the codec against a storage backend. Every mutation reads the
//! current buffer, decodes it, applies the change, re-packs the whole
//! keystore, and writes it back in one piece.

use crate::algorithm::Algorithm;
use crate::errors::{KeyringError, Result};
use crate::keystore::collection::Keystore;
use crate::keystore::storage::KeystoreStorage;
use crate::security::SecureBytes;
use tracing::{debug, info};

/// Keyring bound to one storage backend
pub struct Keyring<S> {
    storage: S,
}

impl<S: KeystoreStorage> Keyring<S> {
    /// Create a new keyring over the given storage
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create an empty keystore
    pub fn create(&self) -> Result<()> {
        if self.storage.exists()? {
            return Err(KeyringError::KeystoreAlreadyExists);
        }
        self.storage.write(&[])?;
        info!("Created empty keystore");
        Ok(())
    }

    /// Raw stored buffer
    pub fn load_raw(&self) -> Result<SecureBytes> {
        self.storage.read()
    }

    /// Fetch and decode the keystore
    pub fn load(&self) -> Result<Keystore> {
        let data = self.storage.read()?;
        let keystore = Keystore::unpack(data.expose())?;
        debug!("Loaded keystore with {} entries", keystore.len());
        Ok(keystore)
    }

    /// Add a new key to the keystore
    pub fn add_entry(&self, entry: Algorithm) -> Result<Keystore> {
        let mut keystore = self.load()?;
        let name = entry.name();
        keystore.add(entry);
        self.store(&keystore)?;

        info!("Added {} key ({} entries)", name, keystore.len());
        Ok(keystore)
    }

    /// Remove a key from the keystore
    pub fn remove_entry(&self, entry: &Algorithm) -> Result<Keystore> {
        let mut keystore = self.load()?;
        let removed = keystore.remove(entry)?;
        self.store(&keystore)?;

        info!(
            "Removed {} {} key(s) ({} entries left)",
            removed,
            entry.name(),
            keystore.len()
        );
        Ok(keystore)
    }

    /// Replace the stored keystore
    pub fn store(&self, keystore: &Keystore) -> Result<()> {
        let packed = SecureBytes::new(keystore.pack()?);
        self.storage.write(packed.expose())
    }
}
