//! Shared application state.
//!
//! Contains the state that is shared across all request handlers.

use crate::config::MonitorConfig;
use crate::metrics::Metrics;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; the metrics clone shares
/// the registry the monitoring loop writes to.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<MonitorConfig>,
    /// Metrics registry, read on every scrape.
    pub metrics: Metrics,
}
