//! Recognized key algorithms
//!
//! Every algorithm owns a unique key discriminator, a fixed key length, and
//! the configuration fields it needs. `Algorithm` is the closed set of
//! records a keystore can hold; decoding goes through the registry, encoding
//! is an exhaustive match.

pub mod registry;
pub mod variants;

pub use registry::{registry, AlgorithmRegistry, AlgorithmSpec};
pub use variants::{ChaCha20Poly1305, Curve25519, Ed25519, Rsa, X25519};

use crate::errors::{KeyringError, Result};
use crate::tlv::{ConfigSection, Discriminator, KeySection, KeystoreEntry};

/// A named configuration field an algorithm requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigField {
    pub name: &'static str,
    pub discriminator: Discriminator,
    /// Required value length in bytes
    pub length: usize,
}

impl ConfigField {
    /// Check a value against this field's declared length
    pub fn check_length(&self, value: &[u8]) -> Result<()> {
        if value.len() != self.length {
            return Err(KeyringError::LengthMismatch {
                section: "configuration entry",
                expected: self.length,
                actual: value.len(),
            });
        }
        Ok(())
    }

    /// Read this field's value out of a configuration section
    ///
    /// Fields are matched by discriminator, never by position.
    pub fn read<const N: usize>(
        &self,
        algorithm: &'static str,
        config: &ConfigSection,
    ) -> Result<[u8; N]> {
        debug_assert_eq!(N, self.length, "{} read with the wrong width", self.name);

        let entry = config
            .get(&self.discriminator)
            .ok_or(KeyringError::MissingConfiguration {
                algorithm,
                field: self.name,
            })?;
        self.check_length(&entry.value)?;

        entry
            .value
            .as_slice()
            .try_into()
            .map_err(|_| KeyringError::LengthMismatch {
                section: "configuration entry",
                expected: N,
                actual: entry.value.len(),
            })
    }
}

/// Reject configuration a record would not write back
///
/// Every entry must name one of `fields`, and each field must appear
/// exactly once. Anything else would be lost when the keystore is re-packed.
fn check_configuration(
    algorithm: &'static str,
    fields: &[ConfigField],
    config: &ConfigSection,
) -> Result<()> {
    let entries = config.entries();
    if let Some(unknown) = entries
        .iter()
        .find(|entry| !fields.iter().any(|field| field.discriminator == entry.key))
    {
        return Err(KeyringError::InvalidDiscriminator {
            section: "configuration entry",
            found: unknown.key,
        });
    }
    if let Some(missing) = fields.iter().find(|field| config.get(&field.discriminator).is_none()) {
        return Err(KeyringError::MissingConfiguration {
            algorithm,
            field: missing.name,
        });
    }
    if entries.len() != fields.len() {
        return Err(KeyringError::LengthMismatch {
            section: "configuration",
            expected: fields.len(),
            actual: entries.len(),
        });
    }
    Ok(())
}

/// Behaviour shared by every key algorithm record
pub trait KeyAlgorithm: Sized {
    /// Human-readable name, also used on the command line
    const NAME: &'static str;
    /// Key section discriminator
    const DISCRIMINATOR: Discriminator;
    /// The length of the key in bytes
    const KEY_LENGTH: usize;
    /// Required configuration fields, in the order they are written
    const CONFIGURATIONS: &'static [ConfigField] = &[];

    fn key_bytes(&self) -> &[u8];

    /// Configuration section written alongside the key
    fn configuration(&self) -> ConfigSection {
        ConfigSection::Absent
    }

    /// Build the record from already-validated parts
    fn from_parts(key: &[u8], config: &ConfigSection) -> Result<Self>;

    fn to_entry(&self) -> KeystoreEntry {
        KeystoreEntry::new(
            KeySection::new(Self::DISCRIMINATOR, self.key_bytes()),
            self.configuration(),
        )
    }

    fn from_entry(entry: &KeystoreEntry) -> Result<Self> {
        if entry.key.discriminator != Self::DISCRIMINATOR {
            return Err(KeyringError::InvalidDiscriminator {
                section: "key",
                found: entry.key.discriminator,
            });
        }
        if entry.key.key.len() != Self::KEY_LENGTH {
            return Err(KeyringError::LengthMismatch {
                section: "key",
                expected: Self::KEY_LENGTH,
                actual: entry.key.key.len(),
            });
        }
        check_configuration(Self::NAME, Self::CONFIGURATIONS, &entry.config)?;
        Self::from_parts(&entry.key.key, &entry.config)
    }
}

/// A keystore record: one of the recognized algorithms
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Curve25519(Curve25519),
    X25519(X25519),
    Ed25519(Ed25519),
    Rsa(Rsa),
    ChaCha20Poly1305(ChaCha20Poly1305),
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Curve25519(_) => Curve25519::NAME,
            Algorithm::X25519(_) => X25519::NAME,
            Algorithm::Ed25519(_) => Ed25519::NAME,
            Algorithm::Rsa(_) => Rsa::NAME,
            Algorithm::ChaCha20Poly1305(_) => ChaCha20Poly1305::NAME,
        }
    }

    pub fn discriminator(&self) -> Discriminator {
        match self {
            Algorithm::Curve25519(_) => Curve25519::DISCRIMINATOR,
            Algorithm::X25519(_) => X25519::DISCRIMINATOR,
            Algorithm::Ed25519(_) => Ed25519::DISCRIMINATOR,
            Algorithm::Rsa(_) => Rsa::DISCRIMINATOR,
            Algorithm::ChaCha20Poly1305(_) => ChaCha20Poly1305::DISCRIMINATOR,
        }
    }

    pub fn key_bytes(&self) -> &[u8] {
        match self {
            Algorithm::Curve25519(inner) => inner.key_bytes(),
            Algorithm::X25519(inner) => inner.key_bytes(),
            Algorithm::Ed25519(inner) => inner.key_bytes(),
            Algorithm::Rsa(inner) => inner.key_bytes(),
            Algorithm::ChaCha20Poly1305(inner) => inner.key_bytes(),
        }
    }

    /// Render this record as a keystore entry
    pub fn to_entry(&self) -> KeystoreEntry {
        match self {
            Algorithm::Curve25519(inner) => inner.to_entry(),
            Algorithm::X25519(inner) => inner.to_entry(),
            Algorithm::Ed25519(inner) => inner.to_entry(),
            Algorithm::Rsa(inner) => inner.to_entry(),
            Algorithm::ChaCha20Poly1305(inner) => inner.to_entry(),
        }
    }

    /// Decode a keystore entry through the built-in registry
    pub fn from_entry(entry: &KeystoreEntry) -> Result<Self> {
        registry().decode(entry)
    }

    /// Pack this record as a standalone keystore entry
    pub fn pack(&self) -> Result<Vec<u8>> {
        self.to_entry().pack()
    }

    pub fn unpack(data: &[u8]) -> Result<Self> {
        let (entry, end) = KeystoreEntry::unpack(data)?;
        if end != data.len() {
            return Err(KeyringError::LengthMismatch {
                section: "entry",
                expected: end,
                actual: data.len(),
            });
        }
        Self::from_entry(&entry)
    }
}

impl From<Curve25519> for Algorithm {
    fn from(inner: Curve25519) -> Self {
        Algorithm::Curve25519(inner)
    }
}

impl From<X25519> for Algorithm {
    fn from(inner: X25519) -> Self {
        Algorithm::X25519(inner)
    }
}

impl From<Ed25519> for Algorithm {
    fn from(inner: Ed25519) -> Self {
        Algorithm::Ed25519(inner)
    }
}

impl From<Rsa> for Algorithm {
    fn from(inner: Rsa) -> Self {
        Algorithm::Rsa(inner)
    }
}

impl From<ChaCha20Poly1305> for Algorithm {
    fn from(inner: ChaCha20Poly1305) -> Self {
        Algorithm::ChaCha20Poly1305(inner)
    }
}
