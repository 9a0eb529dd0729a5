//! Keystore collection codec
//!
//! A keystore buffer is the concatenation of packed keystore entries with no
//! count prefix; each entry's own length field delimits it.

use crate::algorithm::Algorithm;
use crate::errors::{KeyringError, Result};
use crate::tlv::KeystoreEntry;
use tracing::{debug, trace};

/// An ordered collection of key records
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keystore {
    entries: Vec<Algorithm>,
}

impl Keystore {
    /// Create a new empty keystore
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Algorithm>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Algorithm] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Algorithm> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: &Algorithm) -> bool {
        self.entries.contains(entry)
    }

    /// Append an entry
    pub fn add(&mut self, entry: Algorithm) {
        self.entries.push(entry);
    }

    /// Remove every entry equal to `entry`
    ///
    /// Returns the number of entries removed.
    pub fn remove(&mut self, entry: &Algorithm) -> Result<usize> {
        let before = self.entries.len();
        self.entries.retain(|existing| existing != entry);
        let removed = before - self.entries.len();
        if removed == 0 {
            return Err(KeyringError::EntryNotFound);
        }
        Ok(removed)
    }

    /// Pack every entry, in order, into one buffer
    pub fn pack(&self) -> Result<Vec<u8>> {
        let rendered: Vec<KeystoreEntry> = self.entries.iter().map(Algorithm::to_entry).collect();

        // Size the buffer once up front
        let total: usize = rendered.iter().map(KeystoreEntry::packed_len).sum();
        let mut out = Vec::with_capacity(total);
        for entry in &rendered {
            entry.pack_into(&mut out)?;
        }

        debug!("Packed {} keystore entries into {} bytes", self.len(), out.len());
        Ok(out)
    }

    /// Unpack a keystore buffer
    ///
    /// An empty buffer is an empty keystore. Any malformed or unrecognized
    /// entry fails the whole call.
    pub fn unpack(data: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut offset = 0;

        while offset < data.len() {
            let (entry, consumed) = KeystoreEntry::unpack(&data[offset..])?;
            let algorithm = Algorithm::from_entry(&entry)?;
            trace!(
                "Decoded {} entry at offset {} ({} bytes)",
                algorithm.name(),
                offset,
                consumed
            );
            entries.push(algorithm);
            offset += consumed;
        }

        debug!("Unpacked {} keystore entries from {} bytes", entries.len(), data.len());
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{ChaCha20Poly1305, Curve25519, Ed25519, Rsa, X25519};
    use crate::tlv::KEYSTORE_ENTRY;

    fn sample_keystore() -> Keystore {
        Keystore::from_entries(vec![
            Curve25519::new([1u8; 32]).into(),
            Rsa::new([2u8; 64]).into(),
            ChaCha20Poly1305::new([3u8; 32], [4u8; 12], [5u8; 12]).into(),
            X25519::new([6u8; 32]).into(),
        ])
    }

    #[test]
    fn test_empty_buffer_is_empty_keystore() {
        let keystore = Keystore::unpack(&[]).unwrap();
        assert!(keystore.is_empty());
        assert_eq!(Keystore::new().pack().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let keystore = sample_keystore();
        let packed = keystore.pack().unwrap();
        let unpacked = Keystore::unpack(&packed).unwrap();

        assert_eq!(unpacked, keystore);
        let names: Vec<_> = unpacked.iter().map(Algorithm::name).collect();
        assert_eq!(names, vec!["curve25519", "rsa", "chacha20poly1305", "x25519"]);
    }

    #[test]
    fn test_no_count_prefix() {
        let keystore = Keystore::from_entries(vec![Curve25519::new([0u8; 32]).into()]);
        let packed = keystore.pack().unwrap();

        assert_eq!(packed.len(), 57);
        assert_eq!(&packed[..8], KEYSTORE_ENTRY.as_bytes());
    }

    #[test]
    fn test_packed_length_is_sum_of_entries() {
        let keystore = sample_keystore();
        let expected: usize = keystore
            .iter()
            .map(|entry| entry.pack().unwrap().len())
            .sum();
        assert_eq!(keystore.pack().unwrap().len(), expected);
    }

    #[test]
    fn test_every_truncation_inside_an_entry_fails() {
        let keystore = sample_keystore();
        let packed = keystore.pack().unwrap();

        // Cutting exactly on an entry boundary leaves a shorter valid keystore
        let mut boundaries = Vec::new();
        let mut end = 0;
        for entry in keystore.iter() {
            end += entry.pack().unwrap().len();
            boundaries.push(end);
        }
        for (count, &boundary) in boundaries.iter().enumerate() {
            let prefix = Keystore::unpack(&packed[..boundary]).unwrap();
            assert_eq!(prefix.entries(), &keystore.entries()[..count + 1]);
        }

        for len in (1..packed.len()).filter(|len| !boundaries.contains(len)) {
            let result = Keystore::unpack(&packed[..len]);
            assert!(
                matches!(
                    result,
                    Err(KeyringError::Truncated { .. }) | Err(KeyringError::LengthMismatch { .. })
                ),
                "truncation to {} bytes gave {:?}",
                len,
                result
            );
        }
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let mut packed = sample_keystore().pack().unwrap();
        packed.extend_from_slice(&[0u8; 3]);
        assert!(matches!(
            Keystore::unpack(&packed),
            Err(KeyringError::Truncated { .. })
        ));
    }

    #[test]
    fn test_unknown_algorithm_fails_whole_buffer() {
        let mut packed = sample_keystore().pack().unwrap();
        // Second entry starts at 57; its key discriminator at +12
        packed[57 + 12] ^= 0xff;
        assert!(matches!(
            Keystore::unpack(&packed),
            Err(KeyringError::UnrecognizedAlgorithm(_))
        ));
    }

    #[test]
    fn test_add_then_remove_restores_buffer() {
        let mut keystore = sample_keystore();
        let original = keystore.pack().unwrap();

        let extra: Algorithm = Ed25519::new([9u8; 32]).into();
        keystore.add(extra.clone());
        assert_ne!(keystore.pack().unwrap(), original);
        assert_eq!(keystore.len(), 5);

        assert_eq!(keystore.remove(&extra).unwrap(), 1);
        assert_eq!(keystore.pack().unwrap(), original);
    }

    #[test]
    fn test_remove_filters_all_matches() {
        let target: Algorithm = Curve25519::new([1u8; 32]).into();
        let mut keystore = sample_keystore();
        keystore.add(target.clone());

        assert_eq!(keystore.remove(&target).unwrap(), 2);
        assert!(!keystore.contains(&target));
        assert_eq!(keystore.len(), 3);
    }

    #[test]
    fn test_remove_missing_entry() {
        let mut keystore = sample_keystore();
        let missing: Algorithm = Curve25519::new([0xee; 32]).into();
        assert!(matches!(
            keystore.remove(&missing),
            Err(KeyringError::EntryNotFound)
        ));
        assert_eq!(keystore, sample_keystore());
    }
}
