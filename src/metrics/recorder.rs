//! Metrics recording implementation using Prometheus.

use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramVec, Opts, Registry, TextEncoder,
    register_counter_vec_with_registry, register_gauge_vec_with_registry,
    register_histogram_vec_with_registry,
};
use std::sync::Arc;

use super::ErrorType;

/// Trait for recording brokerage API metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records a completed request (any status code) and its latency.
    fn record_request(&self, endpoint: &str, status_code: &str, duration_secs: f64);

    /// Records a failed or degraded call.
    fn record_error(&self, endpoint: &str, error_type: ErrorType);

    /// Sets the last seen `X-RateLimit-Remaining` value for an endpoint.
    fn set_rate_limit_remaining(&self, endpoint: &str, remaining: i64);

    /// Sets the last seen `X-RateLimit-Limit` value for an endpoint.
    fn set_rate_limit_limit(&self, endpoint: &str, limit: i64);

    /// Counts a low rate-limit headroom warning.
    fn record_rate_limit_warning(&self, endpoint: &str);
}

/// Prometheus metrics collector.
///
/// Cloning is cheap; every clone shares the same registry and instruments.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    // Request metrics
    pub request_duration_seconds: HistogramVec,
    pub requests_total: CounterVec,
    pub errors_total: CounterVec,

    // Rate limit metrics
    pub rate_limit_remaining: GaugeVec,
    pub rate_limit_limit: GaugeVec,
    pub rate_limit_warnings_total: CounterVec,
}

impl Metrics {
    /// Content type of the text exposition format produced by `render`.
    pub const CONTENT_TYPE: &'static str = "text/plain; version=0.0.4; charset=utf-8";

    /// Creates a new metrics instance with its own Prometheus registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(Registry::new()))
    }

    /// Registers every instrument into `registry`.
    ///
    /// # Panics
    ///
    /// Panics if any instrument name is already registered there.
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        let request_duration_seconds = register_histogram_vec_with_registry!(
            "alpaca_api_request_duration_seconds",
            "Histogram of response time for Alpaca API requests",
            &["endpoint", "status_code"],
            vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
            registry.clone()
        )
        .expect("Failed to register alpaca_api_request_duration_seconds");

        let requests_total = register_counter_vec_with_registry!(
            Opts::new(
                "alpaca_api_requests_total",
                "Total number of Alpaca API requests"
            ),
            &["endpoint", "status_code"],
            registry.clone()
        )
        .expect("Failed to register alpaca_api_requests_total");

        let errors_total = register_counter_vec_with_registry!(
            Opts::new("alpaca_api_errors_total", "Total number of Alpaca API errors"),
            &["endpoint", "error_type"],
            registry.clone()
        )
        .expect("Failed to register alpaca_api_errors_total");

        let rate_limit_remaining = register_gauge_vec_with_registry!(
            Opts::new(
                "alpaca_rate_limit_remaining",
                "How many Alpaca calls are left in the current window"
            ),
            &["endpoint"],
            registry.clone()
        )
        .expect("Failed to register alpaca_rate_limit_remaining");

        let rate_limit_limit = register_gauge_vec_with_registry!(
            Opts::new(
                "alpaca_rate_limit_limit",
                "Alpaca calls allowed per rate limit window"
            ),
            &["endpoint"],
            registry.clone()
        )
        .expect("Failed to register alpaca_rate_limit_limit");

        let rate_limit_warnings_total = register_counter_vec_with_registry!(
            Opts::new(
                "alpaca_rate_limit_warning_total",
                "Times a low rate limit headroom was reported"
            ),
            &["endpoint"],
            registry.clone()
        )
        .expect("Failed to register alpaca_rate_limit_warning_total");

        Metrics {
            registry,
            request_duration_seconds,
            requests_total,
            errors_total,
            rate_limit_remaining,
            rate_limit_limit,
            rate_limit_warnings_total,
        }
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .expect("Failed to encode metrics");
        String::from_utf8(buffer).expect("Metrics encoding produced invalid UTF-8")
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_request(&self, endpoint: &str, status_code: &str, duration_secs: f64) {
        self.request_duration_seconds
            .with_label_values(&[endpoint, status_code])
            .observe(duration_secs);
        self.requests_total
            .with_label_values(&[endpoint, status_code])
            .inc();
    }

    fn record_error(&self, endpoint: &str, error_type: ErrorType) {
        self.errors_total
            .with_label_values(&[endpoint, error_type.as_str()])
            .inc();
    }

    fn set_rate_limit_remaining(&self, endpoint: &str, remaining: i64) {
        self.rate_limit_remaining
            .with_label_values(&[endpoint])
            .set(remaining as f64);
    }

    fn set_rate_limit_limit(&self, endpoint: &str, limit: i64) {
        self.rate_limit_limit
            .with_label_values(&[endpoint])
            .set(limit as f64);
    }

    fn record_rate_limit_warning(&self, endpoint: &str) {
        self.rate_limit_warnings_total
            .with_label_values(&[endpoint])
            .inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCOUNT: &str = "https://paper-api.alpaca.markets/v2/account";

    #[test]
    fn record_request_observes_and_counts_once() {
        let metrics = Metrics::new();
        metrics.record_request(ACCOUNT, "200", 0.3);

        let histogram = metrics
            .request_duration_seconds
            .with_label_values(&[ACCOUNT, "200"]);
        assert_eq!(histogram.get_sample_count(), 1);
        assert!((histogram.get_sample_sum() - 0.3).abs() < f64::EPSILON);
        assert_eq!(
            metrics.requests_total.with_label_values(&[ACCOUNT, "200"]).get(),
            1.0
        );
    }

    #[test]
    fn record_error_uses_error_type_label() {
        let metrics = Metrics::new();
        metrics.record_error(ACCOUNT, ErrorType::Network);
        metrics.record_error(ACCOUNT, ErrorType::Network);

        assert_eq!(
            metrics
                .errors_total
                .with_label_values(&[ACCOUNT, "network_error"])
                .get(),
            2.0
        );
    }

    #[test]
    fn render_lists_instruments_and_label_sets() {
        let metrics = Metrics::new();
        metrics.record_request(ACCOUNT, "500", 0.05);
        metrics.record_error(ACCOUNT, ErrorType::Http);
        metrics.set_rate_limit_remaining(ACCOUNT, 150);
        metrics.set_rate_limit_limit(ACCOUNT, 200);

        let text = metrics.render();
        assert!(text.contains("# HELP alpaca_api_requests_total"));
        assert!(text.contains(&format!(
            "alpaca_api_requests_total{{endpoint=\"{}\",status_code=\"500\"}} 1",
            ACCOUNT
        )));
        assert!(text.contains(&format!(
            "alpaca_api_errors_total{{endpoint=\"{}\",error_type=\"http_error\"}} 1",
            ACCOUNT
        )));
        assert!(text.contains(&format!(
            "alpaca_rate_limit_remaining{{endpoint=\"{}\"}} 150",
            ACCOUNT
        )));
        assert!(text.contains(&format!(
            "alpaca_rate_limit_limit{{endpoint=\"{}\"}} 200",
            ACCOUNT
        )));
        assert!(text.contains("alpaca_api_request_duration_seconds_bucket"));
    }

    #[test]
    fn clones_share_instruments() {
        let metrics = Metrics::new();
        let clone = metrics.clone();
        clone.record_rate_limit_warning(ACCOUNT);

        assert_eq!(
            metrics
                .rate_limit_warnings_total
                .with_label_values(&[ACCOUNT])
                .get(),
            1.0
        );
    }

    #[test]
    #[should_panic(expected = "Failed to register alpaca_api_request_duration_seconds")]
    fn duplicate_registration_is_fatal() {
        let registry = Arc::new(Registry::new());
        let _first = Metrics::with_registry(registry.clone());
        let _second = Metrics::with_registry(registry);
    }
}
