use std::borrow::Cow;
use std::fmt;

use serde::Serialize;

/// A Solana cluster the estimator can sample fees from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolanaNetwork {
    /// Lookup key (`mainnet`, `testnet`, `devnet`, or a registered name).
    pub key: Cow<'static, str>,
    pub name: Cow<'static, str>,
    pub rpc_url: Cow<'static, str>,
    pub is_testnet: bool,
}

impl SolanaNetwork {
    pub fn new(
        key: impl Into<Cow<'static, str>>,
        name: impl Into<Cow<'static, str>>,
        rpc_url: impl Into<Cow<'static, str>>,
        is_testnet: bool,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            rpc_url: rpc_url.into(),
            is_testnet,
        }
    }

    /// Same cluster, different endpoint.
    pub fn with_rpc_url(mut self, rpc_url: impl Into<Cow<'static, str>>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }
}

/// Solana Mainnet Beta.
pub const MAINNET: SolanaNetwork = SolanaNetwork {
    key: Cow::Borrowed("mainnet"),
    name: Cow::Borrowed("Solana Mainnet Beta"),
    rpc_url: Cow::Borrowed("https://api.mainnet-beta.solana.com"),
    is_testnet: false,
};

/// Solana Testnet.
pub const TESTNET: SolanaNetwork = SolanaNetwork {
    key: Cow::Borrowed("testnet"),
    name: Cow::Borrowed("Solana Testnet"),
    rpc_url: Cow::Borrowed("https://api.testnet.solana.com"),
    is_testnet: true,
};

/// Solana Devnet.
pub const DEVNET: SolanaNetwork = SolanaNetwork {
    key: Cow::Borrowed("devnet"),
    name: Cow::Borrowed("Solana Devnet"),
    rpc_url: Cow::Borrowed("https://api.devnet.solana.com"),
    is_testnet: true,
};

/// Built-in presets.
pub fn default_networks() -> Vec<SolanaNetwork> {
    vec![MAINNET, TESTNET, DEVNET]
}

/// Find a preset by key.
pub fn network_by_key(key: &str) -> Option<SolanaNetwork> {
    default_networks().into_iter().find(|n| n.key == key)
}

/// Health of the fee source at the time a fee was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkStatus {
    Healthy,
    Unhealthy,
}

impl fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkStatus::Healthy => write!(f, "healthy"),
            NetworkStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}
