use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use tx_decoder::DecodedInstruction;

use crate::cache::{CacheKey, FeeCache};
use crate::clock::{Clock, SystemClock};
use crate::config::FeeEstimatorConfig;
use crate::error::FeeError;
use crate::model::{lamports_to_sol, sampled_priority_fee_lamports, FeeBreakdown};
use crate::network::{default_networks, NetworkStatus, SolanaNetwork, MAINNET};
use crate::oracle::{FeeOracle, RpcFeeOracle};

/// Result of a network fee query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkFee {
    #[serde(flatten)]
    pub fee: FeeBreakdown,
    pub network_status: NetworkStatus,
    pub last_updated: DateTime<Utc>,
}

impl NetworkFee {
    pub fn new(fee: FeeBreakdown, network_status: NetworkStatus, last_updated: DateTime<Utc>) -> Self {
        Self {
            fee,
            network_status,
            last_updated,
        }
    }
}

/// Cost of sending `amount` SOL, fee included.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferEstimate {
    /// Amount plus fee, in SOL.
    pub total_cost: f64,
    /// Fee in SOL.
    pub fee: f64,
    pub network_status: NetworkStatus,
}

/// Computes transaction fees from decoded instructions or live network data.
///
/// Network results are cached per network for the configured TTL. Failures
/// and timeouts never escape: they produce a base-fee-only, `unhealthy`
/// estimate which is not cached.
pub struct FeeEstimator {
    oracle: Arc<dyn FeeOracle>,
    cache: FeeCache,
    config: FeeEstimatorConfig,
    networks: Vec<SolanaNetwork>,
}

impl FeeEstimator {
    /// Estimator backed by Solana JSON-RPC and the system clock.
    pub fn new(config: FeeEstimatorConfig) -> Result<Self, FeeError> {
        config.validate()?;
        let oracle = RpcFeeOracle::new(config.request_timeout())?;
        Ok(Self::with_parts(config, Arc::new(oracle), Arc::new(SystemClock)))
    }

    pub fn with_parts(
        config: FeeEstimatorConfig,
        oracle: Arc<dyn FeeOracle>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            oracle,
            cache: FeeCache::new(clock, config.cache_ttl()),
            config,
            networks: default_networks(),
        }
    }

    pub fn config(&self) -> &FeeEstimatorConfig {
        &self.config
    }

    /// Add a network, or replace the one with the same key.
    pub fn register_network(&mut self, network: SolanaNetwork) -> &mut Self {
        match self.networks.iter_mut().find(|n| n.key == network.key) {
            Some(existing) => *existing = network,
            None => self.networks.push(network),
        }
        self
    }

    pub fn networks(&self) -> &[SolanaNetwork] {
        &self.networks
    }

    /// Look up a network by key. Unknown keys fall back to mainnet.
    pub fn resolve_network(&self, key: &str) -> SolanaNetwork {
        if let Some(network) = self.networks.iter().find(|n| n.key == key) {
            return network.clone();
        }
        warn!(network = key, "unknown network, falling back to mainnet");
        self.networks
            .iter()
            .find(|n| n.key == MAINNET.key)
            .cloned()
            .unwrap_or(MAINNET)
    }

    /// Fee implied by a decoded transaction's compute-budget instructions.
    pub fn from_decoded_instructions(&self, instructions: &[DecodedInstruction]) -> FeeBreakdown {
        let fee = FeeBreakdown::from_decoded_instructions(instructions);
        FeeBreakdown {
            compute_unit_price_micro_lamports: fee.compute_unit_price_micro_lamports,
            compute_unit_limit: fee.compute_unit_limit,
            ..FeeBreakdown::new(self.config.base_fee_lamports, fee.priority_fee_lamports)
        }
    }

    /// Current network fee, using the configured request timeout.
    pub async fn get_network_fee(&self, network_key: &str) -> NetworkFee {
        self.get_network_fee_with_timeout(network_key, self.config.request_timeout())
            .await
    }

    pub async fn get_network_fee_with_timeout(
        &self,
        network_key: &str,
        timeout: Duration,
    ) -> NetworkFee {
        let network = self.resolve_network(network_key);
        let key = CacheKey::network_fee(&network.key);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(network = %network.key, "network fee served from cache");
            return cached;
        }

        match tokio::time::timeout(timeout, self.sample_priority_fee(&network)).await {
            Ok(Ok(priority_fee_lamports)) => {
                let fee = NetworkFee::new(
                    FeeBreakdown::new(self.config.base_fee_lamports, priority_fee_lamports),
                    NetworkStatus::Healthy,
                    self.cache.now(),
                );
                info!(
                    network = %network.key,
                    priority_fee_lamports,
                    total_fee_lamports = fee.fee.total_fee_lamports,
                    "network fee refreshed"
                );
                self.cache.insert(key, fee.clone()).await;
                fee
            }
            Ok(Err(e)) => {
                warn!(network = %network.key, error = %e, "fee sampling failed, using base fee");
                self.degraded()
            }
            Err(_) => {
                let e = FeeError::Timeout(timeout);
                warn!(network = %network.key, error = %e, "fee sampling failed, using base fee");
                self.degraded()
            }
        }
    }

    /// Liveness of the network endpoint. Never consults the cache.
    pub async fn network_status(&self, network_key: &str) -> NetworkStatus {
        let network = self.resolve_network(network_key);
        match tokio::time::timeout(
            self.config.request_timeout(),
            self.oracle.latest_blockhash(&network),
        )
        .await
        {
            Ok(Ok(_)) => NetworkStatus::Healthy,
            Ok(Err(e)) => {
                warn!(network = %network.key, error = %e, "network probe failed");
                NetworkStatus::Unhealthy
            }
            Err(_) => {
                warn!(network = %network.key, "network probe timed out");
                NetworkStatus::Unhealthy
            }
        }
    }

    /// `amount` SOL plus the current network fee.
    pub async fn estimate_transfer_total(
        &self,
        amount_sol: f64,
        network_key: &str,
    ) -> Result<TransferEstimate, FeeError> {
        if !amount_sol.is_finite() || amount_sol < 0.0 {
            return Err(FeeError::InvalidAmount(amount_sol));
        }
        let network_fee = self.get_network_fee(network_key).await;
        let fee = lamports_to_sol(network_fee.fee.total_fee_lamports);
        Ok(TransferEstimate {
            total_cost: amount_sol + fee,
            fee,
            network_status: network_fee.network_status,
        })
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    async fn sample_priority_fee(&self, network: &SolanaNetwork) -> Result<u64, FeeError> {
        self.oracle.latest_blockhash(network).await?;
        let samples = self.oracle.recent_prioritization_fees(network).await?;
        debug!(network = %network.key, samples = samples.len(), "priority fee sample");

        let micro_lamports: Vec<u64> = samples.iter().map(|s| s.prioritization_fee).collect();
        Ok(sampled_priority_fee_lamports(
            &micro_lamports,
            self.config.min_priority_fee_lamports,
        ))
    }

    fn degraded(&self) -> NetworkFee {
        NetworkFee::new(
            FeeBreakdown::base_only(self.config.base_fee_lamports),
            NetworkStatus::Unhealthy,
            self.cache.now(),
        )
    }
}

impl std::fmt::Debug for FeeEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeEstimator")
            .field("config", &self.config)
            .field("networks", &self.networks)
            .field("cache", &self.cache)
            .finish()
    }
}
