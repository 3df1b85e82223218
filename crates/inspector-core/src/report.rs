//! Serializable view of a decoded transaction, as presented to UI and CLI
//! callers. All keys are camelCase.

use fee_estimator::FeeBreakdown;
use serde::Serialize;
use tx_decoder::{
    bytes_to_address, signature_to_string, DecodedInstruction, DecodedPayload, DecodedTransaction,
    InstructionSummary, MessageHeader, SignatureSlot, TokenInstruction, TransactionFormat,
    TransactionVersion,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReport {
    /// `legacy` or `versioned`.
    pub format: &'static str,
    /// `legacy` or the numeric message version.
    pub version: VersionReport,
    pub header: HeaderReport,
    pub recent_blockhash: String,
    /// Static account table, base58, in wire order.
    pub accounts: Vec<String>,
    pub account_roles: Vec<AccountRole>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub address_table_lookups: Vec<LookupReport>,
    pub instructions: Vec<InstructionReport>,
    pub signatures: Vec<SignatureReport>,
    pub summary: SummaryReport,
    pub fee: FeeBreakdown,
    pub raw: RawReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VersionReport {
    Legacy(&'static str),
    Number(u8),
}

impl From<TransactionVersion> for VersionReport {
    fn from(version: TransactionVersion) -> Self {
        match version {
            TransactionVersion::Legacy => VersionReport::Legacy("legacy"),
            TransactionVersion::Number(n) => VersionReport::Number(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderReport {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

impl From<MessageHeader> for HeaderReport {
    fn from(header: MessageHeader) -> Self {
        Self {
            num_required_signatures: header.num_required_signatures,
            num_readonly_signed_accounts: header.num_readonly_signed,
            num_readonly_unsigned_accounts: header.num_readonly_unsigned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRole {
    pub index: usize,
    pub is_signer: bool,
    pub is_writable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReport {
    pub account_key: String,
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionReport {
    pub index: usize,
    pub program_id: String,
    /// Recognized program label, e.g. `ComputeBudget`.
    pub program_type: &'static str,
    /// Program and instruction, e.g. `ComputeBudget::SetComputeUnitPrice`.
    pub instruction_type: String,
    pub program_index: u8,
    pub account_indexes: Vec<u8>,
    pub data_length: usize,
    pub data_hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<PayloadReport>,
}

/// Decoded fields of a recognized instruction payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum PayloadReport {
    #[serde(rename_all = "camelCase")]
    SystemTransfer { lamports: u64, sol: f64 },
    #[serde(rename_all = "camelCase")]
    SetComputeUnitPrice { micro_lamports: u64 },
    #[serde(rename_all = "camelCase")]
    SetComputeUnitLimit { units: u32 },
    #[serde(rename_all = "camelCase")]
    Token { instruction: TokenInstruction },
}

impl PayloadReport {
    pub fn from_payload(payload: &DecodedPayload) -> Option<Self> {
        match *payload {
            DecodedPayload::SystemTransfer { lamports } => Some(PayloadReport::SystemTransfer {
                lamports,
                sol: payload.transfer_sol().unwrap_or_default(),
            }),
            DecodedPayload::ComputeUnitPrice { micro_lamports } => {
                Some(PayloadReport::SetComputeUnitPrice { micro_lamports })
            }
            DecodedPayload::ComputeUnitLimit { units } => {
                Some(PayloadReport::SetComputeUnitLimit { units })
            }
            DecodedPayload::Token(instruction) => Some(PayloadReport::Token { instruction }),
            DecodedPayload::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureReport {
    pub index: usize,
    pub is_empty: bool,
    /// Base58 signature, absent for an empty slot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_if_present: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub total_instructions: usize,
    pub system_instructions: usize,
    pub compute_budget_instructions: usize,
    pub token_instructions: usize,
    pub other_instructions: usize,
}

impl From<InstructionSummary> for SummaryReport {
    fn from(s: InstructionSummary) -> Self {
        Self {
            total_instructions: s.total,
            system_instructions: s.system,
            compute_budget_instructions: s.compute_budget,
            token_instructions: s.token,
            other_instructions: s.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawReport {
    pub base64: String,
    pub hex: String,
    pub length: usize,
}

impl TransactionReport {
    /// Build the report for `tx`, decoded from `bytes` (given as `base64`).
    pub fn new(tx: &DecodedTransaction, base64: &str, bytes: &[u8]) -> Self {
        let accounts = tx.account_table.iter().map(bytes_to_address).collect();
        let account_roles = (0..tx.account_table.len())
            .map(|index| AccountRole {
                index,
                is_signer: tx.is_signer(index),
                is_writable: tx.is_writable(index),
            })
            .collect();

        Self {
            format: match tx.format {
                TransactionFormat::Legacy => "legacy",
                TransactionFormat::Versioned => "versioned",
            },
            version: tx.version.into(),
            header: tx.header.into(),
            recent_blockhash: bytes_to_address(&tx.recent_blockhash),
            accounts,
            account_roles,
            address_table_lookups: tx
                .address_table_lookups
                .iter()
                .map(|l| LookupReport {
                    account_key: bytes_to_address(&l.account_key),
                    writable_indexes: l.writable_indexes.clone(),
                    readonly_indexes: l.readonly_indexes.clone(),
                })
                .collect(),
            instructions: tx
                .instructions
                .iter()
                .enumerate()
                .map(|(index, ix)| instruction_report(tx, index, ix))
                .collect(),
            signatures: tx
                .signatures
                .iter()
                .enumerate()
                .map(|(index, slot)| signature_report(index, slot))
                .collect(),
            summary: tx.summary().into(),
            fee: FeeBreakdown::from_decoded_instructions(&tx.instructions),
            raw: RawReport {
                base64: base64.trim().to_string(),
                hex: hex::encode(bytes),
                length: bytes.len(),
            },
        }
    }
}

fn instruction_report(
    tx: &DecodedTransaction,
    index: usize,
    ix: &DecodedInstruction,
) -> InstructionReport {
    InstructionReport {
        index,
        program_id: tx.program_id(ix).map(bytes_to_address).unwrap_or_default(),
        program_type: ix.program.label(),
        instruction_type: ix.type_label(),
        program_index: ix.program_index,
        account_indexes: ix.account_indexes.clone(),
        data_length: ix.raw_payload.len(),
        data_hex: ix.data_hex(),
        decoded: PayloadReport::from_payload(&ix.payload),
    }
}

fn signature_report(index: usize, slot: &SignatureSlot) -> SignatureReport {
    SignatureReport {
        index,
        is_empty: slot.is_empty,
        value_if_present: slot.value().map(signature_to_string),
        verified: slot.verified,
    }
}
