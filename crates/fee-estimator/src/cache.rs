use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::estimator::NetworkFee;

/// Cache purpose for the sampled network fee.
pub const NETWORK_FEE_PURPOSE: &str = "network-fee";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub network: String,
    pub purpose: &'static str,
}

impl CacheKey {
    pub fn network_fee(network: &str) -> Self {
        Self {
            network: network.to_string(),
            purpose: NETWORK_FEE_PURPOSE,
        }
    }
}

/// Time-bounded store of computed fees.
///
/// An entry is fresh while `now - last_updated < ttl`. Entries are replaced
/// whole on refresh; concurrent refreshes of the same key simply race and the
/// last write wins.
pub struct FeeCache {
    entries: RwLock<HashMap<CacheKey, NetworkFee>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl FeeCache {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            ttl,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// The cached value, if still fresh.
    pub async fn get(&self, key: &CacheKey) -> Option<NetworkFee> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        self.is_fresh(entry.last_updated).then(|| entry.clone())
    }

    pub async fn insert(&self, key: CacheKey, value: NetworkFee) {
        self.entries.write().await.insert(key, value);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn is_fresh(&self, stamped: DateTime<Utc>) -> bool {
        let ttl_ms = i64::try_from(self.ttl.as_millis()).unwrap_or(i64::MAX);
        let elapsed = self.clock.now().signed_duration_since(stamped);
        elapsed.num_milliseconds() < ttl_ms
    }
}

impl std::fmt::Debug for FeeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeCache").field("ttl", &self.ttl).finish()
    }
}
