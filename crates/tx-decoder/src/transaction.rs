//! Transaction wire format decoding.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     version_prefix        u8, versioned framing only (0x80 | version)
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!     address_table_lookups versioned framing only (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//!
//! Address table lookup:
//!   account_key             32 bytes
//!   num_writable            compact-u16
//!   writable_indexes        u8 * num_writable
//!   num_readonly            compact-u16
//!   readonly_indexes        u8 * num_readonly
//! ```
//!
//! A buffer is tried under the versioned framing first and then under the
//! legacy framing. Structural problems abort the whole decode with a
//! [`DecodeError`]; instruction data that does not match a known shape only
//! leaves that instruction's payload undecoded.

use base64::Engine;
use tracing::debug;

use crate::error::{DecodeError, Stage};
use crate::payload::{decode_payload, DecodedPayload};
use crate::programs::{ProgramRegistry, RecognizedProgram};
use crate::reader::ByteReader;
use crate::signature::{verify_slots, SignatureSlot};

/// High bit of the first message byte marks the versioned framing.
const VERSION_PREFIX_MASK: u8 = 0x80;

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// Which wire framing the message used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionFormat {
    Legacy,
    Versioned,
}

/// Message version: the `legacy` sentinel or the number from the prefix byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionVersion {
    Legacy,
    Number(u8),
}

impl std::fmt::Display for TransactionVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionVersion::Legacy => f.write_str("legacy"),
            TransactionVersion::Number(n) => write!(f, "{n}"),
        }
    }
}

/// The three message header counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
}

/// A versioned-message reference to accounts stored in an on-chain lookup
/// table. The addresses themselves are not part of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTableLookup {
    pub account_key: [u8; 32],
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

/// One instruction, with its indices validated against the account table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Index into the account table of the program being invoked.
    pub program_index: u8,
    /// Accounts the instruction reads/writes, in protocol order.
    pub account_indexes: Vec<u8>,
    pub raw_payload: Vec<u8>,
    pub program: RecognizedProgram,
    pub payload: DecodedPayload,
}

impl DecodedInstruction {
    /// Human-readable type, e.g. `ComputeBudget::SetComputeUnitPrice`.
    pub fn type_label(&self) -> String {
        match (self.program, self.payload.name()) {
            (RecognizedProgram::Unknown, _) => "Unknown".to_string(),
            (program, Some(name)) => format!("{}::{name}", program.label()),
            (program, None) => format!("{}::Unknown", program.label()),
        }
    }

    pub fn data_hex(&self) -> String {
        hex::encode(&self.raw_payload)
    }
}

/// Per-program instruction counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstructionSummary {
    pub total: usize,
    pub system: usize,
    pub compute_budget: usize,
    pub token: usize,
    pub other: usize,
}

/// A fully decoded transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub format: TransactionFormat,
    pub version: TransactionVersion,
    pub header: MessageHeader,
    /// Static account keys, in wire order. Instructions address accounts by
    /// position in this table.
    pub account_table: Vec<[u8; 32]>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<DecodedInstruction>,
    pub address_table_lookups: Vec<AddressTableLookup>,
    pub signatures: Vec<SignatureSlot>,
}

impl DecodedTransaction {
    /// The program identifier an instruction invokes.
    pub fn program_id(&self, instruction: &DecodedInstruction) -> Option<&[u8; 32]> {
        self.account_table.get(instruction.program_index as usize)
    }

    /// Number of addresses loaded through lookup tables.
    pub fn loaded_address_count(&self) -> usize {
        self.address_table_lookups
            .iter()
            .map(|l| l.writable_indexes.len() + l.readonly_indexes.len())
            .sum()
    }

    pub fn is_signer(&self, index: usize) -> bool {
        index < self.header.num_required_signatures as usize
    }

    /// Writability of a static account, derived from the header counts.
    pub fn is_writable(&self, index: usize) -> bool {
        let total = self.account_table.len();
        let signers = (self.header.num_required_signatures as usize).min(total);
        if index < signers {
            index < signers.saturating_sub(self.header.num_readonly_signed as usize)
        } else {
            index < total
                && index - signers
                    < (total - signers).saturating_sub(self.header.num_readonly_unsigned as usize)
        }
    }

    pub fn summary(&self) -> InstructionSummary {
        let mut summary = InstructionSummary {
            total: self.instructions.len(),
            ..Default::default()
        };
        for ix in &self.instructions {
            match ix.program {
                RecognizedProgram::System => summary.system += 1,
                RecognizedProgram::ComputeBudget => summary.compute_budget += 1,
                RecognizedProgram::Token => summary.token += 1,
                RecognizedProgram::Unknown => summary.other += 1,
            }
        }
        summary
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Stateless decoder. Holds only configuration, so one instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct TransactionDecoder {
    registry: ProgramRegistry,
    verify_signatures: bool,
}

impl Default for TransactionDecoder {
    fn default() -> Self {
        Self::new(ProgramRegistry::default())
    }
}

/// Message fields shared by both framings, before program resolution.
struct RawMessage {
    format: TransactionFormat,
    version: TransactionVersion,
    header: MessageHeader,
    account_table: Vec<[u8; 32]>,
    recent_blockhash: [u8; 32],
    instructions: Vec<RawInstruction>,
    address_table_lookups: Vec<AddressTableLookup>,
    message_end: usize,
}

struct RawInstruction {
    program_index: u8,
    account_indexes: Vec<u8>,
    data: Vec<u8>,
}

impl TransactionDecoder {
    pub fn new(registry: ProgramRegistry) -> Self {
        Self {
            registry,
            verify_signatures: true,
        }
    }

    /// Enable or disable Ed25519 verification of filled signature slots.
    pub fn with_signature_verification(mut self, enabled: bool) -> Self {
        self.verify_signatures = enabled;
        self
    }

    /// Decode a base64-encoded transaction.
    pub fn decode_base64(&self, encoded: &str) -> Result<DecodedTransaction, DecodeError> {
        self.decode(&base64_to_bytes(encoded)?)
    }

    /// Decode raw transaction bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedTransaction, DecodeError> {
        let mut reader = ByteReader::new(bytes);

        let num_signatures = reader.read_count(64, Stage::Signatures)?;
        let mut signatures = Vec::with_capacity(num_signatures);
        for _ in 0..num_signatures {
            signatures.push(SignatureSlot::new(reader.read_array::<64>(Stage::Signatures)?));
        }
        debug!(num_signatures, offset = reader.position(), "read signature table");

        let message_start = reader.position();
        let message = self.detect_and_parse(&reader)?;
        let message_bytes = &bytes[message_start..message.message_end];

        if self.verify_signatures {
            let signers = (message.header.num_required_signatures as usize)
                .min(message.account_table.len());
            verify_slots(&mut signatures, &message.account_table[..signers], message_bytes);
        }

        let instructions = message
            .instructions
            .into_iter()
            .enumerate()
            .map(|(position, raw)| self.resolve_instruction(position, raw, &message.account_table))
            .collect();

        Ok(DecodedTransaction {
            format: message.format,
            version: message.version,
            header: message.header,
            account_table: message.account_table,
            recent_blockhash: message.recent_blockhash,
            instructions,
            address_table_lookups: message.address_table_lookups,
            signatures,
        })
    }

    /// Try the versioned framing, then the legacy one.
    ///
    /// If both fail, the error of the framing the prefix byte selected is
    /// returned as is: legacy when the marker is absent, versioned when a v0
    /// prefix was read. Only an unsupported version reports both failures.
    fn detect_and_parse(&self, reader: &ByteReader<'_>) -> Result<RawMessage, DecodeError> {
        let versioned_err = match parse_message(reader.clone(), TransactionFormat::Versioned) {
            Ok(message) => return Ok(message),
            Err(err) => err,
        };
        debug!(error = %versioned_err, "versioned framing rejected, trying legacy");

        match parse_message(reader.clone(), TransactionFormat::Legacy) {
            Ok(message) => Ok(message),
            Err(legacy_err) => match versioned_err {
                DecodeError::MissingVersionPrefix(_) => Err(legacy_err),
                DecodeError::UnsupportedVersion(_) => Err(DecodeError::UnrecognizedFormat {
                    versioned: Box::new(versioned_err),
                    legacy: Box::new(legacy_err),
                }),
                versioned_err => Err(versioned_err),
            },
        }
    }

    fn resolve_instruction(
        &self,
        position: usize,
        raw: RawInstruction,
        account_table: &[[u8; 32]],
    ) -> DecodedInstruction {
        // Indices were validated during parsing.
        let program = account_table
            .get(raw.program_index as usize)
            .map(|id| self.registry.resolve(id))
            .unwrap_or(RecognizedProgram::Unknown);

        let payload = match decode_payload(program, &raw.data) {
            Ok(payload) => payload,
            Err(mismatch) => {
                if program != RecognizedProgram::Unknown {
                    debug!(instruction = position, %mismatch, "payload left undecoded");
                }
                DecodedPayload::None
            }
        };

        DecodedInstruction {
            program_index: raw.program_index,
            account_indexes: raw.account_indexes,
            raw_payload: raw.data,
            program,
            payload,
        }
    }
}

/// Decode with the default program registry.
pub fn decode_transaction(bytes: &[u8]) -> Result<DecodedTransaction, DecodeError> {
    TransactionDecoder::default().decode(bytes)
}

/// Decode standard (padded) base64 into raw bytes.
pub fn base64_to_bytes(encoded: &str) -> Result<Vec<u8>, DecodeError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| DecodeError::InvalidEncoding(format!("base64 decode failed: {e}")))
}

// ---------------------------------------------------------------------------
// Message parsing
// ---------------------------------------------------------------------------

fn parse_message(
    mut reader: ByteReader<'_>,
    format: TransactionFormat,
) -> Result<RawMessage, DecodeError> {
    let version = match format {
        TransactionFormat::Versioned => {
            let prefix = reader.peek_u8(Stage::MessageHeader)?;
            if prefix & VERSION_PREFIX_MASK == 0 {
                return Err(DecodeError::MissingVersionPrefix(prefix));
            }
            reader.read_u8(Stage::MessageHeader)?;
            let version = prefix & !VERSION_PREFIX_MASK;
            if version != 0 {
                return Err(DecodeError::UnsupportedVersion(version));
            }
            TransactionVersion::Number(version)
        }
        TransactionFormat::Legacy => TransactionVersion::Legacy,
    };

    let header = MessageHeader {
        num_required_signatures: reader.read_u8(Stage::MessageHeader)?,
        num_readonly_signed: reader.read_u8(Stage::MessageHeader)?,
        num_readonly_unsigned: reader.read_u8(Stage::MessageHeader)?,
    };

    let num_accounts = reader.read_count(32, Stage::AccountTable)?;
    check_header(&header, num_accounts)?;
    let mut account_table = Vec::with_capacity(num_accounts);
    for _ in 0..num_accounts {
        account_table.push(reader.read_array::<32>(Stage::AccountTable)?);
    }

    let recent_blockhash = reader.read_array::<32>(Stage::RecentBlockhash)?;

    let num_instructions = reader.read_compact_u16(Stage::Instructions)? as usize;
    let mut instructions = Vec::with_capacity(num_instructions.min(reader.remaining()));
    for _ in 0..num_instructions {
        let program_index = reader.read_u8(Stage::Instructions)?;
        let num_ix_accounts = reader.read_count(1, Stage::Instructions)?;
        let account_indexes = reader
            .read_bytes(num_ix_accounts, Stage::Instructions)?
            .to_vec();
        let data_len = reader.read_count(1, Stage::Instructions)?;
        let data = reader.read_bytes(data_len, Stage::Instructions)?.to_vec();
        instructions.push(RawInstruction {
            program_index,
            account_indexes,
            data,
        });
    }

    let mut address_table_lookups = Vec::new();
    if format == TransactionFormat::Versioned {
        let num_lookups = reader.read_count(34, Stage::AddressTableLookups)?;
        for _ in 0..num_lookups {
            let account_key = reader.read_array::<32>(Stage::AddressTableLookups)?;
            let num_writable = reader.read_count(1, Stage::AddressTableLookups)?;
            let writable_indexes = reader
                .read_bytes(num_writable, Stage::AddressTableLookups)?
                .to_vec();
            let num_readonly = reader.read_count(1, Stage::AddressTableLookups)?;
            let readonly_indexes = reader
                .read_bytes(num_readonly, Stage::AddressTableLookups)?
                .to_vec();
            address_table_lookups.push(AddressTableLookup {
                account_key,
                writable_indexes,
                readonly_indexes,
            });
        }
    }

    if reader.remaining() > 0 {
        return Err(DecodeError::TrailingBytes {
            remaining: reader.remaining(),
        });
    }

    let loaded: usize = address_table_lookups
        .iter()
        .map(|l| l.writable_indexes.len() + l.readonly_indexes.len())
        .sum();
    check_indexes(&instructions, account_table.len(), loaded)?;

    debug!(
        ?format,
        num_accounts,
        num_instructions,
        num_lookups = address_table_lookups.len(),
        "parsed message"
    );

    Ok(RawMessage {
        format,
        version,
        header,
        account_table,
        recent_blockhash,
        instructions,
        address_table_lookups,
        message_end: reader.position(),
    })
}

fn check_header(header: &MessageHeader, num_accounts: usize) -> Result<(), DecodeError> {
    let invalid = |reason: String| DecodeError::InvalidAccountCount {
        stage: Stage::MessageHeader,
        count: num_accounts,
        reason,
    };

    if num_accounts == 0 {
        return Err(invalid("a transaction needs at least a fee payer".into()));
    }
    let required = header.num_required_signatures as usize;
    if required + header.num_readonly_unsigned as usize > num_accounts {
        return Err(invalid(format!(
            "header declares {required} signers and {} read-only unsigned accounts",
            header.num_readonly_unsigned
        )));
    }
    if header.num_readonly_signed >= header.num_required_signatures {
        return Err(invalid(format!(
            "{} read-only signers leave no writable fee payer among {required} signers",
            header.num_readonly_signed
        )));
    }
    Ok(())
}

/// Program indices must address the static table; account indices may also
/// address lookup-loaded accounts, which follow the static ones.
fn check_indexes(
    instructions: &[RawInstruction],
    num_static: usize,
    num_loaded: usize,
) -> Result<(), DecodeError> {
    for (position, ix) in instructions.iter().enumerate() {
        let out_of_range = |index: u8, bound: usize| DecodeError::IndexOutOfRange {
            stage: Stage::Instructions,
            instruction: position,
            index: index as usize,
            bound,
        };

        if ix.program_index as usize >= num_static {
            return Err(out_of_range(ix.program_index, num_static));
        }
        let bound = num_static + num_loaded;
        if let Some(&bad) = ix.account_indexes.iter().find(|&&i| i as usize >= bound) {
            return Err(out_of_range(bad, bound));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TxFixture;
    use crate::payload::TokenInstruction;
    use crate::programs::{COMPUTE_BUDGET_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};
    use rand::Rng;

    /// Legacy transfer with a priority fee and one unsigned slot.
    const SAMPLE_TX: &str = "AQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAABAAIEef8bsG2Oerd3idSR7gWJg/Lvu2gTN5caLUG2gxsJEGlGbPJTvMRwld1UJI317U53rDCBd1jsy3CZDKkpRjdycQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAwZGb+UhFzL/7K26csOb57yM5bvF9xJrLEObOkAAAAAx+btTHk1miczZQviXncjLaxu9sn7xw3JMR45wxTErVwMDAAkDgNHwCAAAAAADAAUC9AEAAAICAAEMAgAAAACUNXcAAAAA";

    fn accounts(n: u8) -> Vec<[u8; 32]> {
        (1..=n).map(|i| [i; 32]).collect()
    }

    // -- Sample transaction -------------------------------------------------

    #[test]
    fn sample_transaction_decodes_as_legacy() {
        let tx = TransactionDecoder::default().decode_base64(SAMPLE_TX).unwrap();

        assert_eq!(tx.format, TransactionFormat::Legacy);
        assert_eq!(tx.version, TransactionVersion::Legacy);
        assert_eq!(tx.account_table.len(), 4);
        assert_eq!(tx.account_table[2], SYSTEM_PROGRAM_ID);
        assert_eq!(tx.account_table[3], COMPUTE_BUDGET_PROGRAM_ID);
        assert_eq!(
            tx.header,
            MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed: 0,
                num_readonly_unsigned: 2,
            }
        );

        assert_eq!(tx.instructions.len(), 3);
        assert_eq!(
            tx.instructions[0].payload,
            DecodedPayload::ComputeUnitPrice {
                micro_lamports: 150_000_000
            }
        );
        assert_eq!(
            tx.instructions[1].payload,
            DecodedPayload::ComputeUnitLimit { units: 500 }
        );
        assert_eq!(tx.instructions[1].data_hex(), "02f4010000");
        assert_eq!(
            tx.instructions[2].payload,
            DecodedPayload::SystemTransfer {
                lamports: 2_000_000_000
            }
        );
        assert_eq!(tx.instructions[2].account_indexes, vec![0, 1]);
        assert_eq!(tx.instructions[2].type_label(), "SystemProgram::Transfer");

        assert_eq!(tx.signatures.len(), 1);
        assert!(tx.signatures[0].is_empty);
        assert_eq!(tx.signatures[0].verified, None);
    }

    #[test]
    fn sample_transaction_summary_and_roles() {
        let tx = TransactionDecoder::default().decode_base64(SAMPLE_TX).unwrap();
        let summary = tx.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.compute_budget, 2);
        assert_eq!(summary.system, 1);
        assert_eq!(summary.token, 0);
        assert_eq!(summary.other, 0);

        assert!(tx.is_signer(0) && tx.is_writable(0));
        assert!(!tx.is_signer(1) && tx.is_writable(1));
        assert!(!tx.is_writable(2));
        assert!(!tx.is_writable(3));
    }

    // -- Round trip ---------------------------------------------------------

    #[test]
    fn synthetic_transactions_roundtrip() {
        let mut rng = rand::thread_rng();
        for round in 0..200 {
            let versioned = rng.gen_bool(0.5);
            let num_accounts: u8 = rng.gen_range(1..=20);
            let mut fixture = if versioned {
                TxFixture::versioned(accounts(num_accounts))
            } else {
                TxFixture::legacy(accounts(num_accounts))
            };
            for _ in 0..rng.gen_range(0..6) {
                let program_index = rng.gen_range(0..num_accounts);
                let ix_accounts: Vec<u8> = (0..rng.gen_range(0..8))
                    .map(|_| rng.gen_range(0..num_accounts))
                    .collect();
                let data: Vec<u8> = (0..rng.gen_range(0..300)).map(|_| rng.gen()).collect();
                fixture = fixture.instruction(program_index, ix_accounts, data);
            }
            for _ in 0..rng.gen_range(0..3) {
                let mut sig = [0u8; 64];
                rng.fill(&mut sig[..]);
                fixture.signatures.push(sig);
            }

            let tx = TransactionDecoder::default()
                .with_signature_verification(false)
                .decode(&fixture.to_bytes())
                .unwrap_or_else(|e| panic!("round {round}: {e}"));

            let expected_format = if versioned {
                TransactionFormat::Versioned
            } else {
                TransactionFormat::Legacy
            };
            assert_eq!(tx.format, expected_format);
            assert_eq!(tx.account_table, fixture.accounts);
            assert_eq!(tx.signatures.len(), fixture.signatures.len());
            assert_eq!(tx.instructions.len(), fixture.instructions.len());
            for (got, want) in tx.instructions.iter().zip(&fixture.instructions) {
                assert_eq!(got.program_index, want.program_index);
                assert_eq!(got.account_indexes, want.accounts);
                assert_eq!(got.raw_payload, want.data);
            }
        }
    }

    #[test]
    fn empty_instruction_list() {
        let fixture = TxFixture::legacy(accounts(1));
        let tx = decode_transaction(&fixture.to_bytes()).unwrap();
        assert!(tx.instructions.is_empty());
        assert_eq!(tx.summary(), InstructionSummary::default());
    }

    #[test]
    fn large_payload_uses_multibyte_lengths() {
        let data = vec![0xabu8; 1000];
        let fixture = TxFixture::legacy(accounts(2)).instruction(1, vec![0], data.clone());
        let tx = decode_transaction(&fixture.to_bytes()).unwrap();
        assert_eq!(tx.instructions[0].raw_payload, data);
    }

    // -- Format detection ---------------------------------------------------

    #[test]
    fn versioned_v0_with_lookups() {
        let fixture = TxFixture::versioned(vec![[1u8; 32], COMPUTE_BUDGET_PROGRAM_ID])
            .instruction(1, vec![0, 2, 3], vec![2, 0xf4, 0x01, 0, 0])
            .lookup([9u8; 32], vec![4], vec![7]);

        let tx = decode_transaction(&fixture.to_bytes()).unwrap();
        assert_eq!(tx.format, TransactionFormat::Versioned);
        assert_eq!(tx.version, TransactionVersion::Number(0));
        assert_eq!(tx.address_table_lookups.len(), 1);
        assert_eq!(tx.loaded_address_count(), 2);
        assert_eq!(
            tx.instructions[0].payload,
            DecodedPayload::ComputeUnitLimit { units: 500 }
        );
    }

    #[test]
    fn lookup_bound_applies_to_accounts_not_programs() {
        // Account index 4 is past static (2) + loaded (2).
        let fixture = TxFixture::versioned(accounts(2))
            .instruction(1, vec![0, 4], vec![])
            .lookup([9u8; 32], vec![0], vec![1]);
        assert_eq!(
            decode_transaction(&fixture.to_bytes()).unwrap_err(),
            DecodeError::IndexOutOfRange {
                stage: Stage::Instructions,
                instruction: 0,
                index: 4,
                bound: 4,
            }
        );

        // A program index into loaded accounts is never valid.
        let fixture = TxFixture::versioned(accounts(2))
            .instruction(2, vec![], vec![])
            .lookup([9u8; 32], vec![0], vec![]);
        assert!(decode_transaction(&fixture.to_bytes()).is_err());
    }

    #[test]
    fn unsupported_version_is_reported() {
        let mut bytes = TxFixture::versioned(accounts(1)).to_bytes();
        // Signature count 0, then the prefix byte.
        bytes[1] = 0x81;
        match decode_transaction(&bytes).unwrap_err() {
            DecodeError::UnrecognizedFormat { versioned, legacy } => {
                assert_eq!(*versioned, DecodeError::UnsupportedVersion(1));
                assert!(matches!(*legacy, DecodeError::InvalidAccountCount { .. }));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn legacy_errors_surface_directly() {
        let mut bytes = TxFixture::legacy(accounts(1)).to_bytes();
        bytes.push(0xff);
        assert_eq!(
            decode_transaction(&bytes).unwrap_err(),
            DecodeError::TrailingBytes { remaining: 1 }
        );
    }

    // -- Boundaries ---------------------------------------------------------

    #[test]
    fn program_index_one_past_end_is_out_of_range() {
        let fixture = TxFixture::legacy(accounts(3)).instruction(3, vec![0], vec![]);
        assert_eq!(
            decode_transaction(&fixture.to_bytes()).unwrap_err(),
            DecodeError::IndexOutOfRange {
                stage: Stage::Instructions,
                instruction: 0,
                index: 3,
                bound: 3,
            }
        );
    }

    #[test]
    fn versioned_program_index_one_past_end_is_out_of_range() {
        let fixture = TxFixture::versioned(accounts(3)).instruction(3, vec![0], vec![]);
        assert_eq!(
            decode_transaction(&fixture.to_bytes()).unwrap_err(),
            DecodeError::IndexOutOfRange {
                stage: Stage::Instructions,
                instruction: 0,
                index: 3,
                bound: 3,
            }
        );
    }

    #[test]
    fn account_index_out_of_range() {
        let fixture = TxFixture::legacy(accounts(3))
            .instruction(0, vec![0, 1], vec![])
            .instruction(1, vec![2, 200], vec![]);
        assert!(matches!(
            decode_transaction(&fixture.to_bytes()).unwrap_err(),
            DecodeError::IndexOutOfRange {
                instruction: 1,
                index: 200,
                ..
            }
        ));
    }

    #[test]
    fn every_truncation_is_an_error() {
        let bytes = TxFixture::legacy(accounts(3))
            .instruction(2, vec![0, 1], vec![2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0])
            .to_bytes();
        for len in 0..bytes.len() {
            assert!(
                decode_transaction(&bytes[..len]).is_err(),
                "prefix of {len} bytes decoded"
            );
        }
    }

    #[test]
    fn truncated_account_table_names_stage() {
        let bytes = TxFixture::legacy(accounts(3)).to_bytes();
        // 1 (sig count) + 3 (header) + 1 (account count) + 40 bytes of keys.
        let err = decode_transaction(&bytes[..45]).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::TruncatedBuffer {
                stage: Stage::AccountTable,
                ..
            }
        ));
        assert!(err.to_string().contains("account table"));
    }

    #[test]
    fn zero_accounts_is_invalid_account_count() {
        let mut fixture = TxFixture::legacy(Vec::new());
        fixture.header = MessageHeader::default();
        assert!(matches!(
            decode_transaction(&fixture.to_bytes()).unwrap_err(),
            DecodeError::InvalidAccountCount { count: 0, .. }
        ));
    }

    #[test]
    fn header_exceeding_accounts_is_invalid() {
        let mut fixture = TxFixture::legacy(accounts(2));
        fixture.header.num_required_signatures = 3;
        assert!(matches!(
            decode_transaction(&fixture.to_bytes()).unwrap_err(),
            DecodeError::InvalidAccountCount { count: 2, .. }
        ));
    }

    #[test]
    fn read_only_fee_payer_is_invalid() {
        let mut fixture = TxFixture::legacy(accounts(2));
        fixture.header = MessageHeader {
            num_required_signatures: 1,
            num_readonly_signed: 1,
            num_readonly_unsigned: 0,
        };
        let err = decode_transaction(&fixture.to_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidAccountCount { count: 2, .. }));
        assert!(err.to_string().contains("no writable fee payer"));
    }

    #[test]
    fn invalid_base64_is_encoding_error() {
        assert!(matches!(
            TransactionDecoder::default().decode_base64("%%%"),
            Err(DecodeError::InvalidEncoding(_))
        ));
    }

    // -- Payload isolation --------------------------------------------------

    #[test]
    fn unmatched_payload_does_not_fail_decode() {
        let fixture = TxFixture::legacy(vec![[1u8; 32], COMPUTE_BUDGET_PROGRAM_ID, TOKEN_PROGRAM_ID])
            .instruction(1, vec![], vec![9, 9, 9])
            .instruction(2, vec![0], vec![7, 1, 0, 0, 0, 0, 0, 0, 0])
            .instruction(2, vec![0], vec![42]);
        let tx = decode_transaction(&fixture.to_bytes()).unwrap();

        assert_eq!(tx.instructions[0].payload, DecodedPayload::None);
        assert_eq!(tx.instructions[0].type_label(), "ComputeBudget::Unknown");
        assert_eq!(
            tx.instructions[1].payload,
            DecodedPayload::Token(TokenInstruction::MintTo)
        );
        assert_eq!(tx.instructions[1].type_label(), "TokenProgram::MintTo");
        assert_eq!(tx.instructions[2].payload, DecodedPayload::None);
    }

    #[test]
    fn unknown_program_keeps_raw_payload() {
        let fixture =
            TxFixture::legacy(accounts(2)).instruction(1, vec![0], vec![2, 0, 0, 0]);
        let tx = decode_transaction(&fixture.to_bytes()).unwrap();
        assert_eq!(tx.instructions[0].program, RecognizedProgram::Unknown);
        assert_eq!(tx.instructions[0].type_label(), "Unknown");
        assert_eq!(tx.instructions[0].raw_payload, vec![2, 0, 0, 0]);
        assert_eq!(tx.program_id(&tx.instructions[0]), Some(&[2u8; 32]));
    }

    #[test]
    fn custom_registry_is_used() {
        let mut registry = ProgramRegistry::default();
        registry.register([2u8; 32], RecognizedProgram::Token);
        let fixture = TxFixture::legacy(accounts(2)).instruction(1, vec![0], vec![8]);
        let tx = TransactionDecoder::new(registry)
            .decode(&fixture.to_bytes())
            .unwrap();
        assert_eq!(
            tx.instructions[0].payload,
            DecodedPayload::Token(TokenInstruction::Burn)
        );
    }

    // -- Signatures ---------------------------------------------------------

    #[test]
    fn signed_fixture_verifies() {
        let key = ed25519_dalek::SigningKey::from_bytes(&[0x42u8; 32]);
        let payer = key.verifying_key().to_bytes();
        let fixture = TxFixture::legacy(vec![payer, [2u8; 32], SYSTEM_PROGRAM_ID])
            .instruction(2, vec![0, 1], vec![2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0])
            .signed(&[key]);

        let tx = decode_transaction(&fixture.to_bytes()).unwrap();
        assert!(!tx.signatures[0].is_empty);
        assert_eq!(tx.signatures[0].verified, Some(true));

        // Flip one message byte: the blockhash.
        let mut tampered = fixture.clone();
        tampered.blockhash[0] ^= 0xff;
        let mut bytes = tampered.message_bytes();
        let mut wire = vec![1u8];
        wire.extend_from_slice(&fixture.signatures[0]);
        wire.append(&mut bytes);
        let tx = decode_transaction(&wire).unwrap();
        assert_eq!(tx.signatures[0].verified, Some(false));
    }

    #[test]
    fn versioned_signature_covers_prefix_byte() {
        let key = ed25519_dalek::SigningKey::from_bytes(&[0x24u8; 32]);
        let payer = key.verifying_key().to_bytes();
        let fixture = TxFixture::versioned(vec![payer]).signed(&[key]);
        let tx = decode_transaction(&fixture.to_bytes()).unwrap();
        assert_eq!(tx.signatures[0].verified, Some(true));
    }

    #[test]
    fn verification_can_be_disabled() {
        let mut fixture = TxFixture::legacy(accounts(1));
        fixture.signatures.push([5u8; 64]);
        let tx = TransactionDecoder::default()
            .with_signature_verification(false)
            .decode(&fixture.to_bytes())
            .unwrap();
        assert_eq!(tx.signatures[0].verified, None);
        assert!(!tx.signatures[0].is_empty);
    }
}
