//! Well-known on-chain program identifiers and the lookup table that maps an
//! account-table entry to a [`RecognizedProgram`].

use serde::Serialize;

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// The System Program public key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: [u8; 32] = [0u8; 32];

/// Compute Budget Program ID: `ComputeBudget111111111111111111111111111111`
pub const COMPUTE_BUDGET_PROGRAM_ID: [u8; 32] = [
    0x03, 0x06, 0x46, 0x6f, 0xe5, 0x21, 0x17, 0x32, 0xff, 0xec, 0xad, 0xba, 0x72, 0xc3, 0x9b,
    0xe7, 0xbc, 0x8c, 0xe5, 0xbb, 0xc5, 0xf7, 0x12, 0x6b, 0x2c, 0x43, 0x9b, 0x3a, 0x40, 0x00,
    0x00, 0x00,
];

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: [u8; 32] = [
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79,
    0xac, 0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff,
    0x00, 0xa9,
];

/// Which known program an instruction invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecognizedProgram {
    System,
    ComputeBudget,
    Token,
    Unknown,
}

impl RecognizedProgram {
    /// Prefix used in instruction type labels, e.g. `SystemProgram::Transfer`.
    pub fn label(&self) -> &'static str {
        match self {
            RecognizedProgram::System => "SystemProgram",
            RecognizedProgram::ComputeBudget => "ComputeBudget",
            RecognizedProgram::Token => "TokenProgram",
            RecognizedProgram::Unknown => "Unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Exact byte-equality lookup table from program identifier to
/// [`RecognizedProgram`].
#[derive(Debug, Clone)]
pub struct ProgramRegistry {
    entries: Vec<([u8; 32], RecognizedProgram)>,
}

impl Default for ProgramRegistry {
    fn default() -> Self {
        Self {
            entries: vec![
                (SYSTEM_PROGRAM_ID, RecognizedProgram::System),
                (COMPUTE_BUDGET_PROGRAM_ID, RecognizedProgram::ComputeBudget),
                (TOKEN_PROGRAM_ID, RecognizedProgram::Token),
            ],
        }
    }
}

impl ProgramRegistry {
    /// A registry with no entries; every program resolves to `Unknown`.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Map another identifier to a program kind, replacing any existing entry
    /// for the same identifier.
    pub fn register(&mut self, program_id: [u8; 32], kind: RecognizedProgram) -> &mut Self {
        if let Some(entry) = self.entries.iter_mut().find(|(id, _)| *id == program_id) {
            entry.1 = kind;
        } else {
            self.entries.push((program_id, kind));
        }
        self
    }

    pub fn resolve(&self, program_id: &[u8; 32]) -> RecognizedProgram {
        self.entries
            .iter()
            .find(|(id, _)| id == program_id)
            .map(|(_, kind)| *kind)
            .unwrap_or(RecognizedProgram::Unknown)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
