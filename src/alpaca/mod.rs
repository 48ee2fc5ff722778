//! Authenticated polling of the Alpaca REST API.

mod client;
mod error;
pub mod rate_limit;

pub use client::{API_KEY_ID_HEADER, API_SECRET_KEY_HEADER, ApiClient, RequestOutcome};
pub use error::RequestError;
