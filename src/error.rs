//! Startup failures. Any of these ends the process before the monitor runs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("error loading .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("API credentials not set: {0} is missing or empty")]
    MissingCredential(&'static str),

    #[error("invalid logging.{field} '{value}'; valid values: {expected}")]
    InvalidLogging {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
