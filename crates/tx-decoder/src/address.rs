//! Base58 display encoding for 32-byte account identifiers and 64-byte
//! signatures.
//!
//! Identifiers are opaque: the decoder only ever compares raw bytes. Base58
//! is used at the output boundary and for parsing user-supplied identifiers.

use crate::error::DecodeError;

/// Encode 32 bytes as a Base58 address string.
pub fn bytes_to_address(bytes: &[u8; 32]) -> String {
    bs58::encode(bytes).into_string()
}

/// Encode a 64-byte signature the way explorers display it.
pub fn signature_to_string(bytes: &[u8; 64]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a Base58 address string to its 32-byte representation.
///
/// Returns an error if the address is not valid Base58 or does not decode
/// to exactly 32 bytes.
pub fn address_to_bytes(address: &str) -> Result<[u8; 32], DecodeError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| DecodeError::InvalidEncoding(format!("base58 decode failed: {e}")))?;

    let arr: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
        DecodeError::InvalidEncoding(format!("expected 32 address bytes, got {}", v.len()))
    })?;

    Ok(arr)
}
