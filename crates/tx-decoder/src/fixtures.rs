//! Wire-format builder for test transactions.
//!
//! Compiled for this crate's tests and, behind the `fixtures` feature, for
//! downstream test suites. Indices are written exactly as given, so invalid
//! transactions can be produced on purpose.

use ed25519_dalek::Signer;

use crate::reader::encode_compact_u16;
use crate::transaction::{AddressTableLookup, MessageHeader};

/// An instruction as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureInstruction {
    pub program_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct TxFixture {
    pub versioned: bool,
    pub header: MessageHeader,
    pub accounts: Vec<[u8; 32]>,
    pub blockhash: [u8; 32],
    pub instructions: Vec<FixtureInstruction>,
    pub lookups: Vec<AddressTableLookup>,
    pub signatures: Vec<[u8; 64]>,
}

impl TxFixture {
    /// Legacy message with one writable signer (the first account).
    pub fn legacy(accounts: Vec<[u8; 32]>) -> Self {
        Self {
            versioned: false,
            header: MessageHeader {
                num_required_signatures: 1,
                num_readonly_signed: 0,
                num_readonly_unsigned: 0,
            },
            accounts,
            blockhash: [0xcc; 32],
            instructions: Vec::new(),
            lookups: Vec::new(),
            signatures: Vec::new(),
        }
    }

    /// Version 0 message with one writable signer.
    pub fn versioned(accounts: Vec<[u8; 32]>) -> Self {
        Self {
            versioned: true,
            ..Self::legacy(accounts)
        }
    }

    pub fn instruction(mut self, program_index: u8, accounts: Vec<u8>, data: Vec<u8>) -> Self {
        self.instructions.push(FixtureInstruction {
            program_index,
            accounts,
            data,
        });
        self
    }

    pub fn lookup(mut self, account_key: [u8; 32], writable: Vec<u8>, readonly: Vec<u8>) -> Self {
        self.lookups.push(AddressTableLookup {
            account_key,
            writable_indexes: writable,
            readonly_indexes: readonly,
        });
        self
    }

    /// Replace the signature table with signatures over the message bytes.
    pub fn signed(mut self, keys: &[ed25519_dalek::SigningKey]) -> Self {
        let message = self.message_bytes();
        self.signatures = keys
            .iter()
            .map(|key| key.sign(&message).to_bytes())
            .collect();
        self
    }

    /// Serialize the message (the bytes that get signed).
    pub fn message_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);

        if self.versioned {
            buf.push(0x80);
        }
        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed);
        buf.push(self.header.num_readonly_unsigned);

        buf.extend_from_slice(&encode_compact_u16(self.accounts.len() as u16));
        for key in &self.accounts {
            buf.extend_from_slice(key);
        }

        buf.extend_from_slice(&self.blockhash);

        buf.extend_from_slice(&encode_compact_u16(self.instructions.len() as u16));
        for ix in &self.instructions {
            buf.push(ix.program_index);
            buf.extend_from_slice(&encode_compact_u16(ix.accounts.len() as u16));
            buf.extend_from_slice(&ix.accounts);
            buf.extend_from_slice(&encode_compact_u16(ix.data.len() as u16));
            buf.extend_from_slice(&ix.data);
        }

        if self.versioned {
            buf.extend_from_slice(&encode_compact_u16(self.lookups.len() as u16));
            for lookup in &self.lookups {
                buf.extend_from_slice(&lookup.account_key);
                buf.extend_from_slice(&encode_compact_u16(lookup.writable_indexes.len() as u16));
                buf.extend_from_slice(&lookup.writable_indexes);
                buf.extend_from_slice(&encode_compact_u16(lookup.readonly_indexes.len() as u16));
                buf.extend_from_slice(&lookup.readonly_indexes);
            }
        }

        buf
    }

    /// Full wire bytes: signature table followed by the message.
    pub fn to_bytes(&self) -> Vec<u8> {
        let message = self.message_bytes();
        let mut wire = Vec::with_capacity(3 + 64 * self.signatures.len() + message.len());
        wire.extend_from_slice(&encode_compact_u16(self.signatures.len() as u16));
        for sig in &self.signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&message);
        wire
    }
}
