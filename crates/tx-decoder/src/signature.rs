//! Signature slots and Ed25519 verification of the slots that are filled.

use ed25519_dalek::{Signature, VerifyingKey};

/// One 64-byte entry of the transaction's signature table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSlot {
    pub bytes: [u8; 64],
    /// `true` iff every byte is zero: a placeholder for a signer that has
    /// not signed yet.
    pub is_empty: bool,
    /// Result of verifying the slot against the matching signer account over
    /// the message bytes. `None` for empty slots and slots with no signer
    /// account to check against.
    pub verified: Option<bool>,
}

impl SignatureSlot {
    pub fn new(bytes: [u8; 64]) -> Self {
        Self {
            is_empty: bytes.iter().all(|b| *b == 0),
            bytes,
            verified: None,
        }
    }

    /// The signature bytes, or `None` for an empty slot.
    pub fn value(&self) -> Option<&[u8; 64]> {
        (!self.is_empty).then_some(&self.bytes)
    }
}

/// Verify `signature` over `message` for the Ed25519 key `signer`.
///
/// An identifier that is not a valid curve point simply fails verification.
pub fn verify_signature(signer: &[u8; 32], message: &[u8], signature: &[u8; 64]) -> bool {
    let Ok(key) = VerifyingKey::from_bytes(signer) else {
        return false;
    };
    key.verify_strict(message, &Signature::from_bytes(signature))
        .is_ok()
}

/// Fill in `verified` for every non-empty slot. Slot `i` belongs to account
/// `i` of the static account table.
pub fn verify_slots(slots: &mut [SignatureSlot], accounts: &[[u8; 32]], message: &[u8]) {
    for (slot, signer) in slots.iter_mut().zip(accounts.iter()) {
        if !slot.is_empty {
            slot.verified = Some(verify_signature(signer, message, &slot.bytes));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Signer;

    #[test]
    fn all_zero_slot_is_empty() {
        let slot = SignatureSlot::new([0u8; 64]);
        assert!(slot.is_empty);
        assert_eq!(slot.value(), None);
    }

    #[test]
    fn single_nonzero_byte_is_not_empty() {
        for pos in [0usize, 1, 31, 32, 62, 63] {
            let mut bytes = [0u8; 64];
            bytes[pos] = 0x01;
            let slot = SignatureSlot::new(bytes);
            assert!(!slot.is_empty, "byte {pos} set but slot reported empty");
            assert_eq!(slot.value(), Some(&bytes));
        }
    }

    #[test]
    fn verify_accepts_real_signature() {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&[0x42u8; 32]);
        let pubkey = signing_key.verifying_key().to_bytes();
        let message = b"message bytes";
        let sig = signing_key.sign(message).to_bytes();

        assert!(verify_signature(&pubkey, message, &sig));
        assert!(!verify_signature(&pubkey, b"other bytes", &sig));
    }

    #[test]
    fn verify_slots_skips_empty_and_extra_slots() {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&[0x11u8; 32]);
        let pubkey = signing_key.verifying_key().to_bytes();
        let message = b"msg";

        let mut slots = vec![
            SignatureSlot::new(signing_key.sign(message).to_bytes()),
            SignatureSlot::new([0u8; 64]),
            SignatureSlot::new([7u8; 64]),
        ];
        // Only two accounts: the third slot has no signer to check against.
        verify_slots(&mut slots, &[pubkey, [9u8; 32]], message);

        assert_eq!(slots[0].verified, Some(true));
        assert_eq!(slots[1].verified, None);
        assert_eq!(slots[2].verified, None);
    }
}
