//! Decoding of instruction data for the recognized programs.
//!
//! | Program        | Opcode               | Length   | Decoded                         |
//! |----------------|----------------------|----------|---------------------------------|
//! | System         | u32 LE tag == 2      | 12 bytes | u64 LE lamports at offset 4     |
//! | Compute Budget | byte 3               | 9 bytes  | u64 LE micro-lamports at 1      |
//! | Compute Budget | byte 2               | 5 bytes  | u32 LE compute units at 1       |
//! | Token          | byte 3, 7 or 8       | any      | classification only             |
//!
//! A payload that matches none of these yields a [`PayloadMismatch`], which
//! the instruction decoder turns into [`DecodedPayload::None`].

use serde::Serialize;

use crate::error::PayloadMismatch;
use crate::programs::RecognizedProgram;
use crate::reader::{read_u32_le, read_u64_le};

/// Lamports per SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// System Program `Transfer` instruction tag (little-endian u32).
pub const SYSTEM_TRANSFER_TAG: u32 = 2;
const SYSTEM_TRANSFER_LEN: usize = 12;

/// Compute Budget `SetComputeUnitLimit` opcode.
pub const SET_COMPUTE_UNIT_LIMIT: u8 = 2;
/// Compute Budget `SetComputeUnitPrice` opcode.
pub const SET_COMPUTE_UNIT_PRICE: u8 = 3;
const COMPUTE_UNIT_LIMIT_LEN: usize = 5;
const COMPUTE_UNIT_PRICE_LEN: usize = 9;

/// The SPL Token instructions we classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenInstruction {
    Transfer,
    MintTo,
    Burn,
}

impl TokenInstruction {
    fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            3 => Some(TokenInstruction::Transfer),
            7 => Some(TokenInstruction::MintTo),
            8 => Some(TokenInstruction::Burn),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TokenInstruction::Transfer => "Transfer",
            TokenInstruction::MintTo => "MintTo",
            TokenInstruction::Burn => "Burn",
        }
    }
}

/// Structured interpretation of an instruction's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodedPayload {
    SystemTransfer { lamports: u64 },
    ComputeUnitPrice { micro_lamports: u64 },
    ComputeUnitLimit { units: u32 },
    Token(TokenInstruction),
    None,
}

impl DecodedPayload {
    pub fn is_none(&self) -> bool {
        matches!(self, DecodedPayload::None)
    }

    /// Transfer amount in SOL. Display only; the lamport value stays exact.
    pub fn transfer_sol(&self) -> Option<f64> {
        match self {
            DecodedPayload::SystemTransfer { lamports } => {
                Some(*lamports as f64 / LAMPORTS_PER_SOL as f64)
            }
            _ => None,
        }
    }

    /// Instruction name within its program, e.g. `Transfer`.
    pub fn name(&self) -> Option<&'static str> {
        match self {
            DecodedPayload::SystemTransfer { .. } => Some("Transfer"),
            DecodedPayload::ComputeUnitPrice { .. } => Some("SetComputeUnitPrice"),
            DecodedPayload::ComputeUnitLimit { .. } => Some("SetComputeUnitLimit"),
            DecodedPayload::Token(kind) => Some(kind.name()),
            DecodedPayload::None => None,
        }
    }
}

/// Interpret `data` as an instruction of `program`.
pub fn decode_payload(
    program: RecognizedProgram,
    data: &[u8],
) -> Result<DecodedPayload, PayloadMismatch> {
    match program {
        RecognizedProgram::System => decode_system(data),
        RecognizedProgram::ComputeBudget => decode_compute_budget(data),
        RecognizedProgram::Token => decode_token(data),
        RecognizedProgram::Unknown => Err(mismatch(program, "no decoder for program".into())),
    }
}

fn decode_system(data: &[u8]) -> Result<DecodedPayload, PayloadMismatch> {
    let program = RecognizedProgram::System;
    if data.len() != SYSTEM_TRANSFER_LEN {
        return Err(mismatch(
            program,
            format!("expected {SYSTEM_TRANSFER_LEN} bytes, got {}", data.len()),
        ));
    }
    match (read_u32_le(data, 0), read_u64_le(data, 4)) {
        (Some(SYSTEM_TRANSFER_TAG), Some(lamports)) => {
            Ok(DecodedPayload::SystemTransfer { lamports })
        }
        (tag, _) => Err(mismatch(
            program,
            format!("instruction tag {tag:?} is not a transfer"),
        )),
    }
}

fn decode_compute_budget(data: &[u8]) -> Result<DecodedPayload, PayloadMismatch> {
    let program = RecognizedProgram::ComputeBudget;
    match (data.first().copied(), data.len()) {
        (Some(SET_COMPUTE_UNIT_PRICE), COMPUTE_UNIT_PRICE_LEN) => read_u64_le(data, 1)
            .map(|micro_lamports| DecodedPayload::ComputeUnitPrice { micro_lamports })
            .ok_or_else(|| mismatch(program, "short price field".into())),
        (Some(SET_COMPUTE_UNIT_LIMIT), COMPUTE_UNIT_LIMIT_LEN) => read_u32_le(data, 1)
            .map(|units| DecodedPayload::ComputeUnitLimit { units })
            .ok_or_else(|| mismatch(program, "short limit field".into())),
        (Some(opcode), len) => Err(mismatch(
            program,
            format!("opcode {opcode} with {len} bytes"),
        )),
        (None, _) => Err(mismatch(program, "empty payload".into())),
    }
}

fn decode_token(data: &[u8]) -> Result<DecodedPayload, PayloadMismatch> {
    let program = RecognizedProgram::Token;
    let opcode = data
        .first()
        .copied()
        .ok_or_else(|| mismatch(program, "empty payload".into()))?;
    TokenInstruction::from_opcode(opcode)
        .map(DecodedPayload::Token)
        .ok_or_else(|| mismatch(program, format!("unclassified opcode {opcode}")))
}

fn mismatch(program: RecognizedProgram, reason: String) -> PayloadMismatch {
    PayloadMismatch {
        program: program.label(),
        reason,
    }
}
