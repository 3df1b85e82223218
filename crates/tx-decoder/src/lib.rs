//! Decoder for Solana's compact account-indexed transaction wire format.
//!
//! Takes raw (or base64) transaction bytes, detects versioned vs. legacy
//! framing, and produces the account table, instructions with their
//! recognized-program payloads, and the signature table, without pulling in
//! `solana-sdk`.
//!
//! Decoding is pure and synchronous: a [`TransactionDecoder`] holds only
//! configuration and can be shared freely across threads.

pub mod address;
pub mod error;
#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;
pub mod payload;
pub mod programs;
pub mod reader;
pub mod signature;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use address::{address_to_bytes, bytes_to_address, signature_to_string};
pub use error::{DecodeError, PayloadMismatch, Stage};
pub use payload::{decode_payload, DecodedPayload, TokenInstruction, LAMPORTS_PER_SOL};
pub use programs::{
    ProgramRegistry, RecognizedProgram, COMPUTE_BUDGET_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
pub use signature::SignatureSlot;
pub use transaction::{
    base64_to_bytes, decode_transaction, AddressTableLookup, DecodedInstruction,
    DecodedTransaction, InstructionSummary, MessageHeader, TransactionDecoder,
    TransactionFormat, TransactionVersion,
};
