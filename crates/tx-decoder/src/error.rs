use std::fmt;

use thiserror::Error;

/// The part of the wire layout being read when a structural error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Signatures,
    MessageHeader,
    AccountTable,
    RecentBlockhash,
    Instructions,
    AddressTableLookups,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Signatures => "signatures",
            Stage::MessageHeader => "message header",
            Stage::AccountTable => "account table",
            Stage::RecentBlockhash => "recent blockhash",
            Stage::Instructions => "instructions",
            Stage::AddressTableLookups => "address table lookups",
        };
        f.write_str(name)
    }
}

/// Structural transaction decode errors.
///
/// Any of these aborts the decode of the whole buffer. Instruction payloads
/// that merely fail to match a known shape are not errors here, see
/// [`PayloadMismatch`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid transaction encoding: {0}")]
    InvalidEncoding(String),

    #[error(
        "unrecognized transaction format: versioned parse failed ({versioned}); \
         legacy parse failed ({legacy})"
    )]
    UnrecognizedFormat {
        versioned: Box<DecodeError>,
        legacy: Box<DecodeError>,
    },

    #[error(
        "truncated buffer in {stage}: needed {needed} bytes at offset {offset}, \
         only {available} available"
    )]
    TruncatedBuffer {
        stage: Stage,
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("{stage}: instruction {instruction} references index {index}, but only {bound} accounts are addressable")]
    IndexOutOfRange {
        stage: Stage,
        instruction: usize,
        index: usize,
        bound: usize,
    },

    #[error("invalid account count {count} in {stage}: {reason}")]
    InvalidAccountCount {
        stage: Stage,
        count: usize,
        reason: String,
    },

    #[error("message has no version prefix (first byte {0:#04x})")]
    MissingVersionPrefix(u8),

    #[error("unsupported message version {0}")]
    UnsupportedVersion(u8),

    #[error("invalid compact-u16 in {stage} at offset {offset}")]
    InvalidCompactU16 { stage: Stage, offset: usize },

    #[error("{remaining} trailing bytes after the end of the message")]
    TrailingBytes { remaining: usize },
}

/// An instruction payload that does not match any known shape for its program.
///
/// Local and non-fatal: the instruction keeps its raw bytes and decodes with
/// an empty payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{program} payload mismatch: {reason}")]
pub struct PayloadMismatch {
    pub program: &'static str,
    pub reason: String,
}
