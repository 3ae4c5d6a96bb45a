//! Minimal SCALE encoder.
//!
//! Only the pieces the `scale-codec` tool exercises are provided: compact
//! integers and length-prefixed byte strings. Collection lengths are
//! encoded as `Compact<u32>`, so anything longer than `u32::MAX` elements is
//! rejected.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScaleError {
    #[error("collection length {0} does not fit in a compact u32")]
    LengthOverflow(usize),
}

const SINGLE_BYTE_MAX: u64 = (1 << 6) - 1;
const TWO_BYTE_MAX: u64 = (1 << 14) - 1;
const FOUR_BYTE_MAX: u64 = (1 << 30) - 1;

pub trait Encode {
    fn encode_to(&self, dest: &mut Vec<u8>) -> Result<(), ScaleError>;

    fn encode(&self) -> Result<Vec<u8>, ScaleError> {
        let mut dest = Vec::new();
        self.encode_to(&mut dest)?;
        Ok(dest)
    }
}

/// Integer wrapper encoded in SCALE's variable-length compact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compact(pub u64);

impl Encode for Compact {
    fn encode_to(&self, dest: &mut Vec<u8>) -> Result<(), ScaleError> {
        let value = self.0;
        if value <= SINGLE_BYTE_MAX {
            dest.push((value as u8) << 2);
        } else if value <= TWO_BYTE_MAX {
            let word = ((value as u16) << 2) | 0b01;
            dest.extend_from_slice(&word.to_le_bytes());
        } else if value <= FOUR_BYTE_MAX {
            let word = ((value as u32) << 2) | 0b10;
            dest.extend_from_slice(&word.to_le_bytes());
        } else {
            // big-integer mode: byte count (minus 4) in the upper six bits
            let used = (8 - value.leading_zeros() as usize / 8).max(4);
            dest.push((((used - 4) as u8) << 2) | 0b11);
            dest.extend_from_slice(&value.to_le_bytes()[..used]);
        }
        Ok(())
    }
}

fn encode_len(len: usize, dest: &mut Vec<u8>) -> Result<(), ScaleError> {
    let len32 = u32::try_from(len).map_err(|_| ScaleError::LengthOverflow(len))?;
    Compact(u64::from(len32)).encode_to(dest)
}

impl Encode for [u8] {
    fn encode_to(&self, dest: &mut Vec<u8>) -> Result<(), ScaleError> {
        encode_len(self.len(), dest)?;
        dest.extend_from_slice(self);
        Ok(())
    }
}

impl Encode for str {
    fn encode_to(&self, dest: &mut Vec<u8>) -> Result<(), ScaleError> {
        self.as_bytes().encode_to(dest)
    }
}

/// Encode `value` into a fresh buffer.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Vec<u8>, ScaleError> {
    value.encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact_hex(value: u64) -> String {
        hex::encode(Compact(value).encode().unwrap())
    }

    #[test]
    fn test_compact_single_byte_mode() {
        assert_eq!(compact_hex(0), "00");
        assert_eq!(compact_hex(1), "04");
        assert_eq!(compact_hex(42), "a8");
        assert_eq!(compact_hex(63), "fc");
    }

    #[test]
    fn test_compact_two_byte_mode() {
        assert_eq!(compact_hex(64), "0101");
        assert_eq!(compact_hex(69), "1501");
        assert_eq!(compact_hex(16383), "fdff");
    }

    #[test]
    fn test_compact_four_byte_mode() {
        assert_eq!(compact_hex(16384), "02000100");
        assert_eq!(compact_hex(1_073_741_823), "feffffff");
    }

    #[test]
    fn test_compact_big_integer_mode() {
        assert_eq!(compact_hex(1_073_741_824), "0300000040");
        assert_eq!(compact_hex(u32::MAX as u64), "03ffffffff");
        assert_eq!(compact_hex(1 << 32), "070000000001");
        assert_eq!(compact_hex(u64::MAX), "13ffffffffffffffff");
    }

    #[test]
    fn test_encode_string() {
        assert_eq!(hex::encode(encode("hello").unwrap()), "1468656c6c6f");
        assert_eq!(hex::encode(encode("").unwrap()), "00");
    }

    #[test]
    fn test_encode_long_string_uses_two_byte_prefix() {
        let input = "a".repeat(64);
        let encoded = encode(input.as_str()).unwrap();
        assert_eq!(&encoded[..2], &[0x01, 0x01]);
        assert_eq!(encoded.len(), 66);
    }

    #[test]
    fn test_encode_utf8_counts_bytes_not_chars() {
        // "é" is two bytes in UTF-8
        assert_eq!(hex::encode(encode("é").unwrap()), "08c3a9");
    }

    #[test]
    fn test_encode_bytes() {
        let bytes: &[u8] = &[0xde, 0xad, 0xbe, 0xef];
        assert_eq!(hex::encode(encode(bytes).unwrap()), "10deadbeef");
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_length_overflow_is_rejected() {
        let mut dest = Vec::new();
        let too_long = u32::MAX as usize + 1;
        assert_eq!(
            encode_len(too_long, &mut dest),
            Err(ScaleError::LengthOverflow(too_long))
        );
        assert!(dest.is_empty());
    }
}
