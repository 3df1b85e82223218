use std::time::Duration;

use thiserror::Error;

/// Fee sampling and configuration errors.
///
/// Network variants never reach callers of
/// [`FeeEstimator::get_network_fee`](crate::FeeEstimator::get_network_fee);
/// they are absorbed into a degraded estimate.
#[derive(Debug, Error)]
pub enum FeeError {
    #[error("rpc transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid rpc response: {0}")]
    InvalidResponse(String),

    #[error("fee query timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid transfer amount: {0}")]
    InvalidAmount(f64),
}

impl From<reqwest::Error> for FeeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FeeError::InvalidResponse(e.to_string())
        } else {
            FeeError::Transport(e.to_string())
        }
    }
}
