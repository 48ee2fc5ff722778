//! Metrics collection and exposition for Prometheus.
//!
//! This module provides the single registry that the API client writes to
//! and the `/metrics` route reads from.

mod labels;
mod recorder;

pub use labels::ErrorType;
pub use recorder::{Metrics, MetricsRecorder};
