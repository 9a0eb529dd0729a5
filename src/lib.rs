//! keyring - nested TLV codec for keystore entries
//!
//! A keystore is a flat byte buffer holding a sequence of self-describing
//! entries. Each entry wraps a key section (algorithm discriminator and raw
//! key bytes) and an optional configuration section (discriminated
//! key/value pairs such as a cipher nonce).
//!
//! - `tlv`: wire layout of entries and their sections
//! - `algorithm`: the closed set of recognized records and the registry
//!   mapping discriminators to decoders
//! - `keystore`: the ordered collection, storage backends and the keyring
//!   service that rewrites the buffer on every mutation
//!
//! # Usage
//!
//! ```bash
//! keyring init
//! keyring add curve25519 --key <64 hex chars>
//! keyring list --format json
//! ```

pub mod algorithm;
pub mod cli;
pub mod config;
pub mod errors;
pub mod keystore;
pub mod security;
pub mod tlv;

pub use algorithm::{registry, Algorithm, AlgorithmRegistry, AlgorithmSpec, KeyAlgorithm};
pub use errors::{KeyringError, Result};
pub use keystore::{FileStorage, Keyring, Keystore, KeystoreStorage, MemoryStorage};
pub use tlv::{ConfigEntry, ConfigSection, Discriminator, KeySection, KeystoreEntry};
