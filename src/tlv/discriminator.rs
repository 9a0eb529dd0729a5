//! Fixed 8-byte discriminators
//!
//! Discriminator values are the first 8 bytes of the SHA-256 digest of a
//! namespaced string. They are stored as literal bytes so the format does not
//! depend on a hash implementation at runtime.

use crate::errors::{KeyringError, Result};
use std::fmt;

/// An opaque 8-byte tag identifying the kind of data that follows
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Discriminator([u8; 8]);

impl Discriminator {
    /// Size of a discriminator in bytes
    pub const LENGTH: usize = 8;

    pub const fn new(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    pub const fn to_bytes(self) -> [u8; 8] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Read a discriminator from the first 8 bytes of `data`
    pub fn from_slice(data: &[u8], section: &'static str) -> Result<Self> {
        let bytes: [u8; 8] = data
            .get(..Self::LENGTH)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| KeyringError::truncated(section, Self::LENGTH, data.len()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Discriminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Discriminator({})", self.to_hex())
    }
}

/// Marks the start of a keystore entry (`keyring:keystore_entry`)
pub const KEYSTORE_ENTRY: Discriminator =
    Discriminator::new([0xa3, 0x2f, 0xc7, 0x37, 0xce, 0x84, 0xec, 0x7b]);

/// Marks a present configuration section (`keyring:keystore_entry:configuration`)
///
/// Its first byte must never be `NO_CONFIGURATIONS`.
pub const HAS_CONFIGURATIONS: Discriminator =
    Discriminator::new([0xc1, 0xb6, 0x70, 0x61, 0xe8, 0x9b, 0xed, 0xdb]);

/// Single-byte sentinel written in place of an absent configuration section
pub const NO_CONFIGURATIONS: u8 = 0;

#[cfg(test)]
pub(crate) fn derive_for_test(input: &str) -> Discriminator {
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(input.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    Discriminator::new(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_constants_match_derivation() {
        assert_eq!(KEYSTORE_ENTRY, derive_for_test("keyring:keystore_entry"));
        assert_eq!(
            HAS_CONFIGURATIONS,
            derive_for_test("keyring:keystore_entry:configuration")
        );
    }

    #[test]
    fn test_has_configurations_never_looks_absent() {
        assert_ne!(HAS_CONFIGURATIONS.as_bytes()[0], NO_CONFIGURATIONS);
        assert_ne!(KEYSTORE_ENTRY, HAS_CONFIGURATIONS);
    }

    #[test]
    fn test_from_slice() {
        let data = [1u8, 2, 3, 4, 5, 6, 7, 8, 9];
        let disc = Discriminator::from_slice(&data, "test").unwrap();
        assert_eq!(disc.to_bytes(), [1, 2, 3, 4, 5, 6, 7, 8]);

        let result = Discriminator::from_slice(&data[..7], "test");
        assert!(matches!(
            result,
            Err(KeyringError::Truncated {
                needed: 8,
                available: 7,
                ..
            })
        ));
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(KEYSTORE_ENTRY.to_hex(), "a32fc737ce84ec7b");
        assert_eq!(KEYSTORE_ENTRY.to_string(), "a32fc737ce84ec7b");
        assert_eq!(
            format!("{:?}", HAS_CONFIGURATIONS),
            "Discriminator(c1b67061e89beddb)"
        );
    }
}
