use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FeeError;
use crate::model::{BASE_FEE_LAMPORTS, DEFAULT_MIN_PRIORITY_FEE_LAMPORTS};

/// Estimator tunables. Every field has a default, so a partial JSON document
/// (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeEstimatorConfig {
    pub base_fee_lamports: u64,
    /// Priority fee reported when the live sample has nothing non-zero.
    pub min_priority_fee_lamports: u64,
    pub cache_ttl_ms: u64,
    /// Upper bound on the probe + sample round trip.
    pub request_timeout_ms: u64,
}

impl Default for FeeEstimatorConfig {
    fn default() -> Self {
        Self {
            base_fee_lamports: BASE_FEE_LAMPORTS,
            min_priority_fee_lamports: DEFAULT_MIN_PRIORITY_FEE_LAMPORTS,
            cache_ttl_ms: 30_000,
            request_timeout_ms: 10_000,
        }
    }
}

impl FeeEstimatorConfig {
    pub fn from_json(json: &str) -> Result<Self, FeeError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| FeeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FeeError> {
        if self.min_priority_fee_lamports == 0 {
            return Err(FeeError::Config(
                "min_priority_fee_lamports must be non-zero".into(),
            ));
        }
        if self.request_timeout_ms == 0 {
            return Err(FeeError::Config("request_timeout_ms must be non-zero".into()));
        }
        Ok(())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
