//! The fee model: base fee plus compute-budget priority fee.
//!
//! All arithmetic is integer lamports / micro-lamports with truncating
//! division. SOL values are produced only when a breakdown is built, from the
//! final lamport totals.

use serde::Serialize;
use tx_decoder::{DecodedInstruction, DecodedPayload, LAMPORTS_PER_SOL};

/// Fixed per-signature base fee.
pub const BASE_FEE_LAMPORTS: u64 = 5_000;

/// Priority fee reported when a live sample has no usable non-zero value.
pub const DEFAULT_MIN_PRIORITY_FEE_LAMPORTS: u64 = 1_000;

/// Compute-unit prices are quoted in micro-lamports.
pub const MICRO_LAMPORTS_PER_LAMPORT: u64 = 1_000_000;

/// A computed transaction cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeBreakdown {
    pub base_fee_lamports: u64,
    pub priority_fee_lamports: u64,
    pub total_fee_lamports: u64,
    pub base_fee_sol: f64,
    pub priority_fee_sol: f64,
    /// `total_fee_lamports` in SOL, for display.
    pub total_fee_sol: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_unit_price_micro_lamports: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute_unit_limit: Option<u32>,
}

impl FeeBreakdown {
    pub fn new(base_fee_lamports: u64, priority_fee_lamports: u64) -> Self {
        let total_fee_lamports = base_fee_lamports.saturating_add(priority_fee_lamports);
        Self {
            base_fee_lamports,
            priority_fee_lamports,
            total_fee_lamports,
            base_fee_sol: lamports_to_sol(base_fee_lamports),
            priority_fee_sol: lamports_to_sol(priority_fee_lamports),
            total_fee_sol: lamports_to_sol(total_fee_lamports),
            compute_unit_price_micro_lamports: None,
            compute_unit_limit: None,
        }
    }

    /// The fixed base fee with no priority fee.
    pub fn base_only(base_fee_lamports: u64) -> Self {
        Self::new(base_fee_lamports, 0)
    }

    /// Cost of a transaction that sets the given compute-unit price and limit.
    pub fn from_compute_budget(price_micro_lamports: u64, limit_units: u32) -> Self {
        Self {
            compute_unit_price_micro_lamports: Some(price_micro_lamports),
            compute_unit_limit: Some(limit_units),
            ..Self::new(
                BASE_FEE_LAMPORTS,
                priority_fee_lamports(price_micro_lamports, limit_units),
            )
        }
    }

    /// Cost derived from a decoded instruction list.
    ///
    /// Uses the first `SetComputeUnitPrice` and the first
    /// `SetComputeUnitLimit` found; a missing one counts as zero.
    pub fn from_decoded_instructions(instructions: &[DecodedInstruction]) -> Self {
        let price = instructions.iter().find_map(|ix| match ix.payload {
            DecodedPayload::ComputeUnitPrice { micro_lamports } => Some(micro_lamports),
            _ => None,
        });
        let limit = instructions.iter().find_map(|ix| match ix.payload {
            DecodedPayload::ComputeUnitLimit { units } => Some(units),
            _ => None,
        });
        Self {
            compute_unit_price_micro_lamports: price,
            compute_unit_limit: limit,
            ..Self::new(
                BASE_FEE_LAMPORTS,
                priority_fee_lamports(price.unwrap_or(0), limit.unwrap_or(0)),
            )
        }
    }
}

/// `floor(price * limit / 1_000_000)`, computed in 128 bits and saturated.
pub fn priority_fee_lamports(price_micro_lamports: u64, limit_units: u32) -> u64 {
    let micro = price_micro_lamports as u128 * limit_units as u128;
    u64::try_from(micro / MICRO_LAMPORTS_PER_LAMPORT as u128).unwrap_or(u64::MAX)
}

/// Representative priority fee from a sample of per-transaction observations
/// in micro-lamports.
///
/// Zero observations are dropped; the mean of the rest is floored in
/// micro-lamports and floored again into lamports. When nothing non-zero
/// remains, or the mean truncates to zero lamports, `floor_lamports` is used.
pub fn sampled_priority_fee_lamports(samples_micro_lamports: &[u64], floor_lamports: u64) -> u64 {
    let non_zero: Vec<u64> = samples_micro_lamports
        .iter()
        .copied()
        .filter(|fee| *fee > 0)
        .collect();
    if non_zero.is_empty() {
        return floor_lamports;
    }

    let sum: u128 = non_zero.iter().map(|fee| *fee as u128).sum();
    let avg_micro_lamports = sum / non_zero.len() as u128;
    let lamports = avg_micro_lamports / MICRO_LAMPORTS_PER_LAMPORT as u128;

    match u64::try_from(lamports) {
        Ok(0) => floor_lamports,
        Ok(lamports) => lamports,
        Err(_) => u64::MAX,
    }
}

/// Display conversion. Only ever applied to final lamport amounts.
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
