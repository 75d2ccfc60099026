use crate::domain::response::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PayoutError {
    #[error("Payout API error: HTTP {}", .0.status_code)]
    Api(ApiError),
    #[error("Malformed response (HTTP {status_code}): {reason}")]
    MalformedResponse { status_code: u16, reason: String },
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PayoutError {
    /// Failures reported by the remote API itself, as opposed to local or network faults.
    pub fn is_api_failure(&self) -> bool {
        matches!(self, Self::Api(_) | Self::MalformedResponse { .. })
    }
}

pub type Result<T> = std::result::Result<T, PayoutError>;
