use crate::data::trip::InvalidTripRange;
use thiserror::Error;

/// Errors raised by the remote trip store.
///
/// Every failure leaves the caller's cached state untouched; nothing is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Trip store endpoint is not configured (set `settings.endpoint` in config.yaml or pass --endpoint)")]
    NotConfigured,

    #[error("Could not reach the trip store: {0}")]
    Transport(String),

    #[error("Trip store reported an error: {0}")]
    Application(String),

    /// Rejected locally; no request was sent.
    #[error("Invalid trip range: {0}")]
    InvalidRange(#[from] InvalidTripRange),

    #[error("Save appeared to succeed but trip '{0}' is missing from the store")]
    NotPropagated(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
