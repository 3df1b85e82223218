use thiserror::Error;

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("could not parse transaction: {0}")]
    Decode(#[from] tx_decoder::DecodeError),

    #[error("fee estimation failed: {0}")]
    Fee(#[from] fee_estimator::FeeError),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for InspectError {
    fn from(e: serde_json::Error) -> Self {
        InspectError::Serialization(e.to_string())
    }
}

impl InspectError {
    /// The underlying structural decode error, if this is one.
    pub fn decode_error(&self) -> Option<&tx_decoder::DecodeError> {
        match self {
            InspectError::Decode(e) => Some(e),
            _ => None,
        }
    }
}
