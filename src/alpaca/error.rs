use thiserror::Error;

use crate::metrics::ErrorType;

/// Why a call to the brokerage produced no usable response.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to build request: {0}")]
    RequestCreation(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),
}

impl RequestError {
    /// The `error_type` label this failure was recorded under.
    pub fn error_type(&self) -> ErrorType {
        match self {
            RequestError::RequestCreation(_) => ErrorType::RequestCreation,
            RequestError::Network(_) => ErrorType::Network,
            RequestError::BodyRead(_) => ErrorType::BodyRead,
        }
    }
}
