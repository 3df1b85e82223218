//! Fee data sources.
//!
//! [`FeeOracle`] is the seam between the estimator and the network; the
//! production implementation speaks Solana JSON-RPC over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::FeeError;
use crate::network::SolanaNetwork;

/// One entry of `getRecentPrioritizationFees`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrioritizationFee {
    pub slot: u64,
    /// Micro-lamports per compute unit.
    pub prioritization_fee: u64,
}

/// Liveness handshake result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    pub blockhash: String,
    pub last_valid_block_height: u64,
}

#[async_trait]
pub trait FeeOracle: Send + Sync {
    /// Connectivity probe.
    async fn latest_blockhash(&self, network: &SolanaNetwork) -> Result<LatestBlockhash, FeeError>;

    /// Recent per-transaction priority-fee observations.
    async fn recent_prioritization_fees(
        &self,
        network: &SolanaNetwork,
    ) -> Result<Vec<PrioritizationFee>, FeeError>;
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorDetail {
    code: i64,
    message: String,
}

/// `{ context, value }` wrapper used by context-carrying RPC methods.
#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

/// JSON-RPC client against each network's `rpc_url`.
#[derive(Debug, Clone)]
pub struct RpcFeeOracle {
    client: Client,
}

impl RpcFeeOracle {
    pub fn new(request_timeout: Duration) -> Result<Self, FeeError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| FeeError::Config(e.to_string()))?;
        Ok(Self { client })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        network: &SolanaNetwork,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, FeeError> {
        debug!(network = %network.key, method, "rpc request");

        let response = self
            .client
            .post(network.rpc_url.as_ref())
            .json(&serde_json::json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": method,
                "params": params,
            }))
            .send()
            .await?
            .error_for_status()?;

        let envelope: RpcEnvelope<T> = response.json().await?;
        parse_envelope(envelope)
    }
}

fn parse_envelope<T>(envelope: RpcEnvelope<T>) -> Result<T, FeeError> {
    if let Some(err) = envelope.error {
        return Err(FeeError::Rpc {
            code: err.code,
            message: err.message,
        });
    }
    envelope
        .result
        .ok_or_else(|| FeeError::InvalidResponse("response has neither result nor error".into()))
}

#[async_trait]
impl FeeOracle for RpcFeeOracle {
    async fn latest_blockhash(&self, network: &SolanaNetwork) -> Result<LatestBlockhash, FeeError> {
        let response: WithContext<LatestBlockhash> = self
            .call(
                network,
                "getLatestBlockhash",
                serde_json::json!([{ "commitment": "confirmed" }]),
            )
            .await?;
        Ok(response.value)
    }

    async fn recent_prioritization_fees(
        &self,
        network: &SolanaNetwork,
    ) -> Result<Vec<PrioritizationFee>, FeeError> {
        self.call(network, "getRecentPrioritizationFees", serde_json::json!([]))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_prioritization_fees() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"result":[
            {"slot":348125,"prioritizationFee":0},
            {"slot":348126,"prioritizationFee":1000}
        ]}"#;
        let envelope: RpcEnvelope<Vec<PrioritizationFee>> = serde_json::from_str(raw).unwrap();
        let fees = parse_envelope(envelope).unwrap();
        assert_eq!(fees.len(), 2);
        assert_eq!(fees[1].slot, 348126);
        assert_eq!(fees[1].prioritization_fee, 1000);
    }

    #[test]
    fn parses_latest_blockhash() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"result":{
            "context":{"slot":2792},
            "value":{"blockhash":"EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N","lastValidBlockHeight":3090}
        }}"#;
        let envelope: RpcEnvelope<WithContext<LatestBlockhash>> =
            serde_json::from_str(raw).unwrap();
        let value = parse_envelope(envelope).unwrap().value;
        assert_eq!(value.last_valid_block_height, 3090);
        assert_eq!(value.blockhash, "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N");
    }

    #[test]
    fn rpc_error_object_surfaces() {
        let raw = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"Method not found"}}"#;
        let envelope: RpcEnvelope<Vec<PrioritizationFee>> = serde_json::from_str(raw).unwrap();
        match parse_envelope(envelope) {
            Err(FeeError::Rpc { code, message }) => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("expected Rpc error, got {:?}", other),
        }
    }

    #[test]
    fn empty_envelope_is_invalid() {
        let envelope: RpcEnvelope<Vec<PrioritizationFee>> =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert!(matches!(
            parse_envelope(envelope),
            Err(FeeError::InvalidResponse(_))
        ));
    }
}
