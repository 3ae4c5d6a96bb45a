//! Hexadecimal conversion used for keys and printed results.

use hex::FromHexError;

/// Render `bytes` as lowercase hexadecimal without a prefix.
pub fn hex_lower(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode a hexadecimal string (either case, no `0x` prefix) into bytes.
pub fn unhex(input: &str) -> Result<Vec<u8>, FromHexError> {
    hex::decode(input)
}
