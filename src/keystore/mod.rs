//! Keystore collection and storage
//!
//! This module provides:
//! - The ordered keystore and its buffer codec
//! - Byte-buffer storage backends (memory, file)
//! - The keyring service applying add/remove mutations

pub mod collection;
pub mod keyring;
pub mod storage;

pub use collection::Keystore;
pub use keyring::Keyring;
pub use storage::{FileStorage, KeystoreStorage, MemoryStorage};
