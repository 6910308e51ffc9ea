// In crates/market-data/src/error.rs

use thiserror::Error;

/// Errors raised while talking to a market-data provider.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuildError(String),
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Provider error: {code}: {description}")]
    ApiError { code: String, description: String },
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(#[from] serde_json::Error),
}

/// The two ways a fetch can come back without bars.
///
/// Callers treat both the same way (an empty series plus a warning); the
/// split only exists so the message tells the user which one happened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("No data available for the selected timeframe.")]
    NoDataAvailable,
    #[error("{0}")]
    FetchFailure(String),
}

impl From<ProviderError> for FetchError {
    fn from(err: ProviderError) -> Self {
        FetchError::FetchFailure(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
