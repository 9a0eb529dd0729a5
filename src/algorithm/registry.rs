//! Algorithm registry
//!
//! Maps key discriminators to the decoder of the matching `Algorithm` variant.
//! The built-in table is built once on first use and never mutated.

use super::{
    Algorithm, ChaCha20Poly1305, ConfigField, Curve25519, Ed25519, KeyAlgorithm, Rsa, X25519,
};
use crate::errors::{KeyringError, Result};
use crate::tlv::{
    ConfigEntry, ConfigSection, Discriminator, KeySection, KeystoreEntry, HAS_CONFIGURATIONS,
    KEYSTORE_ENTRY,
};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Decodes a keystore entry into a concrete variant
pub type DecodeFn = fn(&KeystoreEntry) -> Result<Algorithm>;

/// Registration record for one algorithm
#[derive(Clone, Copy)]
pub struct AlgorithmSpec {
    pub name: &'static str,
    pub discriminator: Discriminator,
    pub key_length: usize,
    pub configurations: &'static [ConfigField],
    pub decode: DecodeFn,
}

impl std::fmt::Debug for AlgorithmSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmSpec")
            .field("name", &self.name)
            .field("discriminator", &self.discriminator)
            .field("key_length", &self.key_length)
            .field("configurations", &self.configurations)
            .finish()
    }
}

fn decode_as<A>(entry: &KeystoreEntry) -> Result<Algorithm>
where
    A: KeyAlgorithm + Into<Algorithm>,
{
    A::from_entry(entry).map(Into::into)
}

impl AlgorithmSpec {
    /// Registration record for a `KeyAlgorithm` implementation
    pub fn of<A>() -> Self
    where
        A: KeyAlgorithm + Into<Algorithm>,
    {
        Self {
            name: A::NAME,
            discriminator: A::DISCRIMINATOR,
            key_length: A::KEY_LENGTH,
            configurations: A::CONFIGURATIONS,
            decode: decode_as::<A>,
        }
    }

    /// Assemble an entry from raw key bytes and named configuration values
    ///
    /// Configuration entries are written in registration order and their
    /// lengths are checked here. The key is not; pass the result through
    /// `AlgorithmRegistry::decode`.
    pub fn build_entry(&self, key: &[u8], fields: &[(&str, &[u8])]) -> Result<KeystoreEntry> {
        if let Some((unknown, _)) = fields
            .iter()
            .find(|(name, _)| !self.configurations.iter().any(|f| f.name == *name))
        {
            return Err(KeyringError::InvalidKeyFormat(format!(
                "{} has no configuration field named {}",
                self.name, unknown
            )));
        }

        let mut entries = Vec::with_capacity(self.configurations.len());
        for field in self.configurations {
            let value = fields
                .iter()
                .find(|(name, _)| *name == field.name)
                .map(|(_, value)| *value)
                .ok_or(KeyringError::MissingConfiguration {
                    algorithm: self.name,
                    field: field.name,
                })?;
            field.check_length(value)?;
            entries.push(ConfigEntry::new(field.discriminator, value));
        }

        Ok(KeystoreEntry::new(
            KeySection::new(self.discriminator, key),
            ConfigSection::new(entries),
        ))
    }
}

/// Discriminator to algorithm lookup table
#[derive(Debug, Default)]
pub struct AlgorithmRegistry {
    specs: Vec<AlgorithmSpec>,
    index: HashMap<Discriminator, usize>,
}

impl AlgorithmRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in algorithm
    ///
    /// The built-in table skips the `register` checks; `builtin_specs` is
    /// run through them in tests instead.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for spec in builtin_specs() {
            registry.insert(spec);
        }
        registry
    }

    /// Add an algorithm, rejecting reserved or already-used discriminators
    pub fn register(&mut self, spec: AlgorithmSpec) -> Result<()> {
        check_not_reserved(&spec.discriminator)?;
        if self.index.contains_key(&spec.discriminator) {
            return Err(KeyringError::DuplicateDiscriminator(spec.discriminator));
        }

        let mut fields = HashSet::new();
        for field in spec.configurations {
            check_not_reserved(&field.discriminator)?;
            if !fields.insert(field.discriminator) {
                return Err(KeyringError::DuplicateDiscriminator(field.discriminator));
            }
        }

        self.insert(spec);
        Ok(())
    }

    fn insert(&mut self, spec: AlgorithmSpec) {
        debug!(
            "Registered algorithm {} ({})",
            spec.name, spec.discriminator
        );
        self.index.insert(spec.discriminator, self.specs.len());
        self.specs.push(spec);
    }

    /// Find an algorithm by key discriminator
    pub fn lookup(&self, discriminator: &Discriminator) -> Result<&AlgorithmSpec> {
        self.index
            .get(discriminator)
            .map(|&i| &self.specs[i])
            .ok_or(KeyringError::UnrecognizedAlgorithm(*discriminator))
    }

    /// Find an algorithm by name (case-insensitive)
    pub fn by_name(&self, name: &str) -> Result<&AlgorithmSpec> {
        self.specs
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| KeyringError::UnknownAlgorithmName(name.to_string()))
    }

    /// Decode an entry into the variant its key discriminator names
    pub fn decode(&self, entry: &KeystoreEntry) -> Result<Algorithm> {
        let spec = self.lookup(&entry.key.discriminator)?;
        (spec.decode)(entry)
    }

    /// Registered algorithms in registration order
    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmSpec> {
        self.specs.iter()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn check_not_reserved(discriminator: &Discriminator) -> Result<()> {
    if *discriminator == KEYSTORE_ENTRY || *discriminator == HAS_CONFIGURATIONS {
        return Err(KeyringError::ReservedDiscriminator(*discriminator));
    }
    Ok(())
}

fn builtin_specs() -> [AlgorithmSpec; 5] {
    [
        AlgorithmSpec::of::<Curve25519>(),
        AlgorithmSpec::of::<X25519>(),
        AlgorithmSpec::of::<Ed25519>(),
        AlgorithmSpec::of::<Rsa>(),
        AlgorithmSpec::of::<ChaCha20Poly1305>(),
    ]
}

static REGISTRY: Lazy<AlgorithmRegistry> = Lazy::new(AlgorithmRegistry::builtin);

/// The process-wide built-in registry
pub fn registry() -> &'static AlgorithmRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry() {
        let registry = AlgorithmRegistry::builtin();
        assert_eq!(registry.len(), 5);

        let names: Vec<_> = registry.iter().map(|spec| spec.name).collect();
        assert_eq!(
            names,
            vec!["curve25519", "x25519", "ed25519", "rsa", "chacha20poly1305"]
        );

        let rsa = registry.lookup(&Rsa::DISCRIMINATOR).unwrap();
        assert_eq!(rsa.key_length, 64);
        assert!(rsa.configurations.is_empty());

        let chacha = registry.by_name("ChaCha20Poly1305").unwrap();
        assert_eq!(chacha.configurations.len(), 2);
    }

    #[test]
    fn test_builtin_specs_pass_registration_checks() {
        let mut checked = AlgorithmRegistry::new();
        for spec in builtin_specs() {
            checked.register(spec).unwrap();
        }

        let builtin = AlgorithmRegistry::builtin();
        let checked_names: Vec<_> = checked.iter().map(|spec| spec.name).collect();
        let builtin_names: Vec<_> = builtin.iter().map(|spec| spec.name).collect();
        assert_eq!(checked_names, builtin_names);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = AlgorithmRegistry::builtin();

        let result = registry.register(AlgorithmSpec::of::<Curve25519>());
        assert!(matches!(
            result,
            Err(KeyringError::DuplicateDiscriminator(d)) if d == Curve25519::DISCRIMINATOR
        ));

        // Same discriminator under a different name is still a duplicate
        let mut impostor = AlgorithmSpec::of::<Ed25519>();
        impostor.name = "not-ed25519";
        assert!(registry.register(impostor).is_err());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_reserved_discriminators_rejected() {
        let mut registry = AlgorithmRegistry::new();

        let mut spec = AlgorithmSpec::of::<Curve25519>();
        spec.discriminator = KEYSTORE_ENTRY;
        assert!(matches!(
            registry.register(spec),
            Err(KeyringError::ReservedDiscriminator(_))
        ));

        spec.discriminator = HAS_CONFIGURATIONS;
        assert!(registry.register(spec).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_config_fields_rejected() {
        static DOUBLED: [ConfigField; 2] = [
            super::super::variants::CHACHA20POLY1305_NONCE,
            super::super::variants::CHACHA20POLY1305_NONCE,
        ];

        let mut spec = AlgorithmSpec::of::<ChaCha20Poly1305>();
        spec.configurations = &DOUBLED[..];

        let mut registry = AlgorithmRegistry::new();
        assert!(matches!(
            registry.register(spec),
            Err(KeyringError::DuplicateDiscriminator(_))
        ));
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = registry();
        let unknown = Discriminator::new([0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 0]);
        assert!(matches!(
            registry.lookup(&unknown),
            Err(KeyringError::UnrecognizedAlgorithm(d)) if d == unknown
        ));
        assert!(matches!(
            registry.by_name("rot13"),
            Err(KeyringError::UnknownAlgorithmName(_))
        ));
    }

    #[test]
    fn test_build_entry_decodes() {
        let spec = registry().by_name("chacha20poly1305").unwrap();
        let key = [9u8; 32];
        let nonce = [1u8; 12];
        let aad = [2u8; 12];

        // Field order on input does not matter
        let entry = spec
            .build_entry(&key, &[("aad", &aad[..]), ("nonce", &nonce[..])])
            .unwrap();
        let decoded = registry().decode(&entry).unwrap();
        assert_eq!(decoded, Algorithm::from(ChaCha20Poly1305::new(key, nonce, aad)));
    }

    #[test]
    fn test_build_entry_field_errors() {
        let chacha = registry().by_name("chacha20poly1305").unwrap();
        assert!(matches!(
            chacha.build_entry(&[0u8; 32], &[("nonce", &[0u8; 12][..])]),
            Err(KeyringError::MissingConfiguration { field: "aad", .. })
        ));

        let curve = registry().by_name("curve25519").unwrap();
        assert!(matches!(
            curve.build_entry(&[0u8; 32], &[("nonce", &[0u8; 12][..])]),
            Err(KeyringError::InvalidKeyFormat(_))
        ));

        assert!(matches!(
            chacha.build_entry(&[0u8; 32], &[("nonce", &[0u8; 8][..]), ("aad", &[0u8; 12][..])]),
            Err(KeyringError::LengthMismatch {
                section: "configuration entry",
                expected: 12,
                actual: 8,
            })
        ));

        let entry = curve.build_entry(&[0u8; 31], &[]).unwrap();
        assert!(matches!(
            registry().decode(&entry),
            Err(KeyringError::LengthMismatch { section: "key", .. })
        ));
    }
}
