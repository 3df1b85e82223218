//! Solana transaction fee estimation.
//!
//! Two sources of truth:
//! - decoded compute-budget instructions, through the pure [`FeeBreakdown`]
//!   model;
//! - a live sample of recent prioritization fees, through [`FeeEstimator`],
//!   which caches per network and degrades to a base-fee-only estimate when
//!   the network cannot be reached.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod estimator;
pub mod model;
pub mod network;
pub mod oracle;

pub use cache::{CacheKey, FeeCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::FeeEstimatorConfig;
pub use error::FeeError;
pub use estimator::{FeeEstimator, NetworkFee, TransferEstimate};
pub use model::{
    lamports_to_sol, priority_fee_lamports, sampled_priority_fee_lamports, FeeBreakdown,
    BASE_FEE_LAMPORTS, DEFAULT_MIN_PRIORITY_FEE_LAMPORTS, MICRO_LAMPORTS_PER_LAMPORT,
};
pub use network::{
    default_networks, network_by_key, NetworkStatus, SolanaNetwork, DEVNET, MAINNET, TESTNET,
};
pub use oracle::{FeeOracle, LatestBlockhash, PrioritizationFee, RpcFeeOracle};
