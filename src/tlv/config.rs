//! Configuration section of a keystore entry
//!
//! Some algorithms need named parameters beyond the raw key bytes (a nonce,
//! additional authenticated data). Each parameter is a `ConfigEntry` keyed by
//! its own discriminator; the entries are grouped in a `ConfigSection` that is
//! either absent (a single `0x00` byte) or present under `HAS_CONFIGURATIONS`.

use crate::errors::{KeyringError, Result};
use crate::tlv::primitive::{read_header, value_end, write_header, HEADER_LEN};
use crate::tlv::{Discriminator, HAS_CONFIGURATIONS, NO_CONFIGURATIONS};

/// One named configuration value
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigEntry {
    /// The configuration field discriminator
    pub key: Discriminator,
    /// The raw value
    pub value: Vec<u8>,
}

impl ConfigEntry {
    pub fn new(key: Discriminator, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// Packed size: header plus value
    pub fn packed_len(&self) -> usize {
        HEADER_LEN + self.value.len()
    }

    /// Append the packed entry to `out`
    pub fn pack_into(&self, out: &mut Vec<u8>) -> Result<()> {
        write_header(out, &self.key, self.value.len())?;
        out.extend_from_slice(&self.value);
        Ok(())
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.packed_len());
        self.pack_into(&mut out)?;
        Ok(out)
    }

    /// Unpack one entry from the start of `data`
    ///
    /// Returns the entry and the offset just past its value, so a caller can
    /// keep scanning a concatenated list.
    pub fn unpack(data: &[u8]) -> Result<(Self, usize)> {
        let (key, length) = read_header(data, "configuration entry")?;
        let end = value_end(data, length, "configuration entry")?;
        let entry = Self {
            key,
            value: data[HEADER_LEN..end].to_vec(),
        };
        Ok((entry, end))
    }
}

/// The configuration section: absent, or present with at least one entry
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConfigSection {
    #[default]
    Absent,
    Present(Vec<ConfigEntry>),
}

impl ConfigSection {
    /// Build a section from entries; an empty list is `Absent`
    pub fn new(entries: Vec<ConfigEntry>) -> Self {
        if entries.is_empty() {
            ConfigSection::Absent
        } else {
            ConfigSection::Present(entries)
        }
    }

    pub fn is_present(&self) -> bool {
        !self.entries().is_empty()
    }

    /// The entries in encounter order (empty when absent)
    pub fn entries(&self) -> &[ConfigEntry] {
        match self {
            ConfigSection::Absent => &[],
            ConfigSection::Present(entries) => entries,
        }
    }

    /// Find an entry by its key discriminator
    pub fn get(&self, key: &Discriminator) -> Option<&ConfigEntry> {
        self.entries().iter().find(|entry| &entry.key == key)
    }

    /// Byte length of the packed entries, excluding the section header
    pub fn payload_len(&self) -> usize {
        self.entries().iter().map(ConfigEntry::packed_len).sum()
    }

    /// Packed size of the whole section
    pub fn packed_len(&self) -> usize {
        if self.is_present() {
            HEADER_LEN + self.payload_len()
        } else {
            1
        }
    }

    /// Append the packed section to `out`
    pub fn pack_into(&self, out: &mut Vec<u8>) -> Result<()> {
        if !self.is_present() {
            out.push(NO_CONFIGURATIONS);
            return Ok(());
        }
        write_header(out, &HAS_CONFIGURATIONS, self.payload_len())?;
        for entry in self.entries() {
            entry.pack_into(out)?;
        }
        Ok(())
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.packed_len());
        self.pack_into(&mut out)?;
        Ok(out)
    }

    /// Unpack a section that spans exactly `data`
    pub fn unpack(data: &[u8]) -> Result<Self> {
        let first = *data
            .first()
            .ok_or_else(|| KeyringError::truncated("configuration", 1, 0))?;

        if first == NO_CONFIGURATIONS {
            if data.len() != 1 {
                return Err(KeyringError::LengthMismatch {
                    section: "configuration",
                    expected: 1,
                    actual: data.len(),
                });
            }
            return Ok(ConfigSection::Absent);
        }

        let (discriminator, length) = read_header(data, "configuration")?;
        if discriminator != HAS_CONFIGURATIONS {
            return Err(KeyringError::InvalidDiscriminator {
                section: "configuration",
                found: discriminator,
            });
        }

        let payload = &data[HEADER_LEN..];
        if length != payload.len() {
            return Err(KeyringError::LengthMismatch {
                section: "configuration",
                expected: length,
                actual: payload.len(),
            });
        }
        if payload.is_empty() {
            return Err(KeyringError::EmptyConfiguration);
        }

        let mut entries = Vec::new();
        let mut offset = 0;
        while offset < payload.len() {
            let (entry, consumed) = ConfigEntry::unpack(&payload[offset..])?;
            entries.push(entry);
            offset += consumed;
        }

        Ok(ConfigSection::Present(entries))
    }
}
