//! Library exports for alpaca-monitor, shared between the binary and tests.

pub mod alpaca;
pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
