//! Key section of a keystore entry

use crate::errors::Result;
use crate::tlv::primitive::{read_header, value_end, write_header, HEADER_LEN};
use crate::tlv::Discriminator;
use zeroize::Zeroize;

/// Algorithm discriminator plus the raw key bytes
///
/// The key bytes are zeroed when the section is dropped.
#[derive(Clone, PartialEq, Eq)]
pub struct KeySection {
    /// The algorithm discriminator
    pub discriminator: Discriminator,
    /// The key data
    pub key: Vec<u8>,
}

impl KeySection {
    pub fn new(discriminator: Discriminator, key: impl Into<Vec<u8>>) -> Self {
        Self {
            discriminator,
            key: key.into(),
        }
    }

    pub fn packed_len(&self) -> usize {
        HEADER_LEN + self.key.len()
    }

    /// Append the packed section to `out`
    pub fn pack_into(&self, out: &mut Vec<u8>) -> Result<()> {
        write_header(out, &self.discriminator, self.key.len())?;
        out.extend_from_slice(&self.key);
        Ok(())
    }

    pub fn pack(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.packed_len());
        self.pack_into(&mut out)?;
        Ok(out)
    }

    /// Unpack a key section from the start of `data`
    ///
    /// Returns the section and the offset just past the key bytes.
    pub fn unpack(data: &[u8]) -> Result<(Self, usize)> {
        let (discriminator, length) = read_header(data, "key")?;
        let end = value_end(data, length, "key")?;
        let section = Self {
            discriminator,
            key: data[HEADER_LEN..end].to_vec(),
        };
        Ok((section, end))
    }
}

impl std::fmt::Debug for KeySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySection")
            .field("discriminator", &self.discriminator)
            .field("key", &crate::security::Redacted(self.key.len()))
            .finish()
    }
}

impl Drop for KeySection {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
