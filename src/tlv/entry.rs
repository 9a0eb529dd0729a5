//! Keystore entry: the top-level TLV record
//!
//! Layout:
//!
//! ```text
//! | KEYSTORE_ENTRY (8) | length (4) | key section | configuration section |
//! ```
//!
//! `length` covers the key and configuration sections, not the entry header.

use crate::errors::{KeyringError, Result};
use crate::tlv::primitive::{read_header, value_end, write_header, HEADER_LEN};
use crate::tlv::{ConfigSection, KeySection, KEYSTORE_ENTRY};

/// One record in a keystore buffer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeystoreEntry {
    /// The key data
    pub key: KeySection,
    /// Additional configuration data
    pub config: ConfigSection,
}

impl KeystoreEntry {
    pub fn new(key: KeySection, config: ConfigSection) -> Self {
        Self { key, config }
    }

    /// Length of the key and configuration sections, as written in the header
    pub fn body_len(&self) -> usize {
        self.key.packed_len() + self.config.packed_len()
    }

    /// Packed size including the entry header
    pub fn packed_len(&self) -> usize {
        HEADER_LEN + self.body_len()
    }

    /// Append the packed entry to `out`
    pub fn pack_into(&self, out: &mut Vec<u8>) -> Result<()> {
        write_header(out, &KEYSTORE_ENTRY, self.body_len())?;
        self.key.pack_into(out)?;
        self.config.pack_into(out)
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.packed_len());
        self.pack_into(&mut out)?;
        Ok(out)
    }

    /// Unpack one entry from the start of `data`
    ///
    /// Returns the entry and the offset of whatever follows it.
    pub fn unpack(data: &[u8]) -> Result<(Self, usize)> {
        let (discriminator, length) = read_header(data, "entry")?;
        if discriminator != KEYSTORE_ENTRY {
            return Err(KeyringError::InvalidDiscriminator {
                section: "entry",
                found: discriminator,
            });
        }
        let entry_end = value_end(data, length, "entry")?;

        // The key section may not spill past the declared entry length
        let (key, key_len) = KeySection::unpack(&data[HEADER_LEN..entry_end])?;
        let key_end = HEADER_LEN + key_len;
        let config = ConfigSection::unpack(&data[key_end..entry_end])?;

        Ok((Self { key, config }, entry_end))
    }
}
