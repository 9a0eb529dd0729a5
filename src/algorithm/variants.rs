//! Concrete key algorithm records
//!
//! Discriminators are the first 8 bytes of SHA-256 over `keyring:key:<name>`
//! (and `keyring:configuration:<name>:<field>` for configuration fields).
//! The byte values are part of the stored format and must never change.

use super::{ConfigField, KeyAlgorithm};
use crate::errors::{KeyringError, Result};
use crate::security::Redacted;
use crate::tlv::{ConfigEntry, ConfigSection, Discriminator};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Copy a key slice into a fixed-size array
fn key_array<const N: usize>(key: &[u8]) -> Result<[u8; N]> {
    key.try_into().map_err(|_| KeyringError::LengthMismatch {
        section: "key",
        expected: N,
        actual: key.len(),
    })
}

/// Declares a fixed-length key algorithm with no configuration
macro_rules! fixed_key_algorithm {
    ($(#[$meta:meta])* $name:ident, $label:literal, $len:literal, $disc:expr) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub fn new(key: [u8; $len]) -> Self {
                Self(key)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&Redacted($len)).finish()
            }
        }

        impl KeyAlgorithm for $name {
            const NAME: &'static str = $label;
            const DISCRIMINATOR: Discriminator = Discriminator::new($disc);
            const KEY_LENGTH: usize = $len;

            fn key_bytes(&self) -> &[u8] {
                &self.0
            }

            fn from_parts(key: &[u8], _config: &ConfigSection) -> Result<Self> {
                Ok(Self(key_array(key)?))
            }
        }
    };
}

fixed_key_algorithm!(
    /// Curve25519 key (`keyring:key:curve25519`)
    Curve25519,
    "curve25519",
    32,
    [0x1a, 0xa1, 0xeb, 0xa5, 0x9a, 0xea, 0xcd, 0xc8]
);

fixed_key_algorithm!(
    /// X25519 key (`keyring:key:x25519`)
    X25519,
    "x25519",
    32,
    [0xf7, 0x34, 0xfc, 0xb6, 0xde, 0xac, 0x99, 0x90]
);

fixed_key_algorithm!(
    /// Ed25519 key (`keyring:key:ed25519`)
    Ed25519,
    "ed25519",
    32,
    [0x8f, 0x82, 0x84, 0xe8, 0xb9, 0xd9, 0xb0, 0x01]
);

fixed_key_algorithm!(
    /// RSA key material (`keyring:key:rsa`)
    Rsa,
    "rsa",
    64,
    [0x40, 0x72, 0xd7, 0xae, 0xe6, 0x57, 0x61, 0x64]
);

/// Nonce field of a ChaCha20-Poly1305 record
pub const CHACHA20POLY1305_NONCE: ConfigField = ConfigField {
    name: "nonce",
    discriminator: Discriminator::new([0x9e, 0x4b, 0x97, 0x16, 0xe2, 0x0f, 0xc8, 0x5d]),
    length: 12,
};

/// Additional authenticated data field of a ChaCha20-Poly1305 record
pub const CHACHA20POLY1305_AAD: ConfigField = ConfigField {
    name: "aad",
    discriminator: Discriminator::new([0xfd, 0x29, 0x3c, 0xf3, 0xd5, 0xac, 0x87, 0x71]),
    length: 12,
};

/// ChaCha20-Poly1305 key with its nonce and additional authenticated data
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChaCha20Poly1305 {
    /// The key itself
    pub key: [u8; 32],
    /// The nonce used for encryption
    pub nonce: [u8; 12],
    /// The associated data used for encryption
    pub aad: [u8; 12],
}

impl ChaCha20Poly1305 {
    pub fn new(key: [u8; 32], nonce: [u8; 12], aad: [u8; 12]) -> Self {
        Self { key, nonce, aad }
    }
}

impl fmt::Debug for ChaCha20Poly1305 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChaCha20Poly1305")
            .field("key", &Redacted(32))
            .field("nonce", &hex::encode(self.nonce))
            .field("aad", &hex::encode(self.aad))
            .finish()
    }
}

impl KeyAlgorithm for ChaCha20Poly1305 {
    const NAME: &'static str = "chacha20poly1305";
    const DISCRIMINATOR: Discriminator =
        Discriminator::new([0x11, 0x31, 0xae, 0x89, 0x07, 0x16, 0xc8, 0x9c]);
    const KEY_LENGTH: usize = 32;
    const CONFIGURATIONS: &'static [ConfigField] = &[CHACHA20POLY1305_NONCE, CHACHA20POLY1305_AAD];

    fn key_bytes(&self) -> &[u8] {
        &self.key
    }

    fn configuration(&self) -> ConfigSection {
        ConfigSection::new(vec![
            ConfigEntry::new(CHACHA20POLY1305_NONCE.discriminator, self.nonce.to_vec()),
            ConfigEntry::new(CHACHA20POLY1305_AAD.discriminator, self.aad.to_vec()),
        ])
    }

    fn from_parts(key: &[u8], config: &ConfigSection) -> Result<Self> {
        Ok(Self {
            key: key_array(key)?,
            nonce: CHACHA20POLY1305_NONCE.read(Self::NAME, config)?,
            aad: CHACHA20POLY1305_AAD.read(Self::NAME, config)?,
        })
    }
}
