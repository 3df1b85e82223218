//! Transaction inspection facade: decode a base64 Solana transaction into a
//! serializable report with its implied fee, and query live network fees.
//!
//! UI and CLI callers go through this crate; the decoder and estimator crates
//! are re-exported for anything more specific.

pub mod error;
pub mod report;

pub use error::InspectError;
pub use fee_estimator;
pub use report::{
    AccountRole, HeaderReport, InstructionReport, LookupReport, PayloadReport, RawReport,
    SignatureReport, SummaryReport, TransactionReport, VersionReport,
};
pub use tx_decoder;

use fee_estimator::{FeeEstimator, NetworkFee, TransferEstimate};
use tracing::debug;
use tx_decoder::{base64_to_bytes, TransactionDecoder};

/// Decode a base64 transaction with the default program registry.
pub fn inspect_transaction(base64: &str) -> Result<TransactionReport, InspectError> {
    inspect_transaction_with(&TransactionDecoder::default(), base64)
}

/// Decode a base64 transaction with a caller-configured decoder.
pub fn inspect_transaction_with(
    decoder: &TransactionDecoder,
    base64: &str,
) -> Result<TransactionReport, InspectError> {
    let bytes = base64_to_bytes(base64)?;
    let tx = decoder.decode(&bytes)?;
    debug!(
        length = bytes.len(),
        accounts = tx.account_table.len(),
        instructions = tx.instructions.len(),
        "transaction decoded"
    );
    Ok(TransactionReport::new(&tx, base64, &bytes))
}

/// Report as pretty-printed JSON.
pub fn inspect_transaction_json(base64: &str) -> Result<String, InspectError> {
    let report = inspect_transaction(base64)?;
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Current fee for `network` (`mainnet`, `testnet`, `devnet`, or a registered
/// key). Never fails: network trouble yields an `unhealthy` base-fee estimate.
pub async fn network_fee(estimator: &FeeEstimator, network: &str) -> NetworkFee {
    estimator.get_network_fee(network).await
}

/// `amount_sol` plus the current network fee.
pub async fn estimate_transfer(
    estimator: &FeeEstimator,
    amount_sol: f64,
    network: &str,
) -> Result<TransferEstimate, InspectError> {
    Ok(estimator.estimate_transfer_total(amount_sol, network).await?)
}
