//! Bounds-checked cursor over a transaction buffer, plus the compact-u16
//! variable-length integer used for every count prefix in the wire format.
//!
//! All multi-byte integers are read explicitly as little-endian.

use crate::error::{DecodeError, Stage};

// ---------------------------------------------------------------------------
// Compact-u16
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value from the start of `data`.
///
/// Returns `(value, bytes_consumed)`. Rejects truncated input, encodings
/// longer than three bytes, values above `u16::MAX` and non-canonical
/// encodings with a zero continuation byte (`[0x80, 0x00]` aliasing 0).
pub fn decode_compact_u16(data: &[u8], stage: Stage) -> Result<(u16, usize), DecodeError> {
    let mut value: u32 = 0;
    let mut consumed = 0usize;

    loop {
        let Some(&byte) = data.get(consumed) else {
            return Err(DecodeError::TruncatedBuffer {
                stage,
                offset: consumed,
                needed: 1,
                available: 0,
            });
        };

        if consumed > 0 && byte == 0 {
            return Err(DecodeError::InvalidCompactU16 {
                stage,
                offset: consumed,
            });
        }

        value |= ((byte & 0x7f) as u32) << (7 * consumed);
        consumed += 1;

        if byte & 0x80 == 0 {
            break;
        }
        if consumed == 3 {
            return Err(DecodeError::InvalidCompactU16 {
                stage,
                offset: consumed - 1,
            });
        }
    }

    if value > u16::MAX as u32 {
        return Err(DecodeError::InvalidCompactU16 {
            stage,
            offset: consumed - 1,
        });
    }

    Ok((value as u16, consumed))
}

// ---------------------------------------------------------------------------
// Little-endian field reads on payload slices
// ---------------------------------------------------------------------------

/// Read a little-endian `u32` at `offset`, or `None` if out of bounds.
pub fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

/// Read a little-endian `u64` at `offset`, or `None` if out of bounds.
pub fn read_u64_le(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = data.get(offset..offset.checked_add(8)?)?;
    Some(u64::from_le_bytes(bytes.try_into().ok()?))
}

// ---------------------------------------------------------------------------
// ByteReader
// ---------------------------------------------------------------------------

/// Forward-only cursor. Every read is checked against the end of the buffer
/// and reports the offset and stage on failure.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Absolute offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Look at the next byte without consuming it.
    pub fn peek_u8(&self, stage: Stage) -> Result<u8, DecodeError> {
        self.buf
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.truncated(stage, 1))
    }

    pub fn read_u8(&mut self, stage: Stage) -> Result<u8, DecodeError> {
        let byte = self.peek_u8(stage)?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_bytes(&mut self, len: usize, stage: Stage) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(self.truncated(stage, len));
        }
        let out = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self, stage: Stage) -> Result<[u8; N], DecodeError> {
        let bytes = self.read_bytes(N, stage)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_compact_u16(&mut self, stage: Stage) -> Result<u16, DecodeError> {
        let start = self.pos;
        let (value, consumed) =
            decode_compact_u16(&self.buf[start..], stage).map_err(|err| match err {
                DecodeError::TruncatedBuffer { needed, .. } => DecodeError::TruncatedBuffer {
                    stage,
                    offset: self.buf.len(),
                    needed,
                    available: 0,
                },
                DecodeError::InvalidCompactU16 { offset, .. } => DecodeError::InvalidCompactU16 {
                    stage,
                    offset: start + offset,
                },
                other => other,
            })?;
        self.pos += consumed;
        Ok(value)
    }

    /// Read a compact-u16 count of fixed-width items, rejecting counts that
    /// cannot possibly fit in the rest of the buffer before any allocation.
    pub fn read_count(&mut self, item_width: usize, stage: Stage) -> Result<usize, DecodeError> {
        let count = self.read_compact_u16(stage)? as usize;
        let needed = count * item_width;
        if needed > self.remaining() {
            return Err(self.truncated(stage, needed));
        }
        Ok(count)
    }

    fn truncated(&self, stage: Stage, needed: usize) -> DecodeError {
        DecodeError::TruncatedBuffer {
            stage,
            offset: self.pos,
            needed,
            available: self.remaining(),
        }
    }
}
