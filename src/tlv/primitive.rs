//! Fixed-width primitives shared by every TLV section

use crate::errors::{KeyringError, Result};
use crate::tlv::Discriminator;

/// Size of a discriminator field
pub const DISCRIMINATOR_LEN: usize = Discriminator::LENGTH;

/// Size of a `u32` length field
pub const LENGTH_LEN: usize = 4;

/// Size of a discriminator plus a length field
pub const HEADER_LEN: usize = DISCRIMINATOR_LEN + LENGTH_LEN;

/// Encode a length as 4 little-endian bytes
pub fn encode_u32(value: usize) -> Result<[u8; 4]> {
    let value = u32::try_from(value).map_err(|_| KeyringError::LengthOverflow(value))?;
    Ok(value.to_le_bytes())
}

/// Decode a little-endian `u32` from the first 4 bytes of `data`
pub fn decode_u32(data: &[u8]) -> Result<u32> {
    let bytes: [u8; LENGTH_LEN] = data
        .get(..LENGTH_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| KeyringError::truncated("u32", LENGTH_LEN, data.len()))?;
    Ok(u32::from_le_bytes(bytes))
}

/// Append a discriminator and length header
pub fn write_header(out: &mut Vec<u8>, discriminator: &Discriminator, length: usize) -> Result<()> {
    // Validate before writing anything so a failed call leaves `out` untouched
    let length = encode_u32(length)?;
    out.extend_from_slice(discriminator.as_bytes());
    out.extend_from_slice(&length);
    Ok(())
}

/// Read a discriminator and length header from the start of `data`
pub fn read_header(data: &[u8], section: &'static str) -> Result<(Discriminator, usize)> {
    if data.len() < HEADER_LEN {
        return Err(KeyringError::truncated(section, HEADER_LEN, data.len()));
    }
    let discriminator = Discriminator::from_slice(data, section)?;
    let length = decode_u32(&data[DISCRIMINATOR_LEN..])? as usize;
    Ok((discriminator, length))
}

/// Compute `HEADER_LEN + length`, bounded by the available bytes
pub fn value_end(data: &[u8], length: usize, section: &'static str) -> Result<usize> {
    let end = HEADER_LEN
        .checked_add(length)
        .ok_or(KeyringError::LengthOverflow(length))?;
    if data.len() < end {
        return Err(KeyringError::truncated(section, end, data.len()));
    }
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u32_little_endian() {
        assert_eq!(encode_u32(45).unwrap(), [0x2d, 0x00, 0x00, 0x00]);
        assert_eq!(encode_u32(0x0102_0304).unwrap(), [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(decode_u32(&[0x2d, 0, 0, 0, 0xff]).unwrap(), 45);
        assert_eq!(decode_u32(&[0xff; 4]).unwrap(), u32::MAX);
    }

    #[test]
    fn test_decode_truncated() {
        let result = decode_u32(&[1, 2, 3]);
        assert!(matches!(
            result,
            Err(KeyringError::Truncated {
                needed: 4,
                available: 3,
                ..
            })
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_encode_overflow() {
        let too_big = u32::MAX as usize + 1;
        assert!(matches!(
            encode_u32(too_big),
            Err(KeyringError::LengthOverflow(n)) if n == too_big
        ));
    }

    #[test]
    fn test_header_round_trip() {
        let disc = Discriminator::new([9; 8]);
        let mut out = Vec::new();
        write_header(&mut out, &disc, 300).unwrap();
        assert_eq!(out.len(), HEADER_LEN);

        let (read_disc, length) = read_header(&out, "test").unwrap();
        assert_eq!(read_disc, disc);
        assert_eq!(length, 300);

        assert!(read_header(&out[..11], "test").is_err());
    }

    #[test]
    fn test_value_end_bounds() {
        let data = [0u8; 20];
        assert_eq!(value_end(&data, 8, "test").unwrap(), 20);
        assert!(matches!(
            value_end(&data, 9, "test"),
            Err(KeyringError::Truncated {
                needed: 21,
                available: 20,
                ..
            })
        ));
    }
}
