use std::time::{Duration, Instant};

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use tracing::{debug, error, info, warn};

use super::error::RequestError;
use super::rate_limit::{LIMIT_HEADER, REMAINING_HEADER, RateLimitHeader, parse_header};
use crate::config::{AlpacaConfig, Credentials};
use crate::error::StartupError;
use crate::metrics::{ErrorType, Metrics, MetricsRecorder};

pub const API_KEY_ID_HEADER: &str = "APCA-API-KEY-ID";
pub const API_SECRET_KEY_HEADER: &str = "APCA-API-SECRET-KEY";

/// What came back from one completed call.
#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub status: StatusCode,
    pub duration: Duration,
    pub rate_limit_remaining: Option<i64>,
    pub rate_limit_limit: Option<i64>,
    pub body: String,
}

/// Issues authenticated GET requests and records every outcome in `M`.
///
/// A call is never retried; failures surface through metrics and logs and
/// through the returned `RequestError`.
#[derive(Clone)]
pub struct ApiClient<M: MetricsRecorder = Metrics> {
    http: reqwest::Client,
    credentials: Credentials,
    metrics: M,
    low_rate_limit_threshold: i64,
}

impl<M: MetricsRecorder> ApiClient<M> {
    pub fn new(
        credentials: Credentials,
        metrics: M,
        config: &AlpacaConfig,
    ) -> Result<Self, StartupError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(ApiClient {
            http,
            credentials,
            metrics,
            low_rate_limit_threshold: config.low_rate_limit_threshold,
        })
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Sends one GET to `endpoint` and records its latency, status and rate limits.
    ///
    /// HTTP error statuses are still `Ok`: the response was received and recorded.
    pub async fn make_request(&self, endpoint: &str) -> Result<RequestOutcome, RequestError> {
        let request = self
            .http
            .get(endpoint)
            .header(API_KEY_ID_HEADER, &self.credentials.key_id)
            .header(API_SECRET_KEY_HEADER, &self.credentials.secret_key)
            .build();
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                self.metrics.record_error(endpoint, ErrorType::RequestCreation);
                error!(
                    event_name = "alpaca.request.invalid",
                    event_domain = "alpaca",
                    endpoint,
                    error = %e,
                    "Failed to build request"
                );
                return Err(RequestError::RequestCreation(e));
            }
        };

        let start = Instant::now();
        let result = self.http.execute(request).await;
        let duration = start.elapsed();

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_error(endpoint, ErrorType::Network);
                error!(
                    event_name = "alpaca.request.failed",
                    event_domain = "alpaca",
                    endpoint,
                    duration_ms = duration.as_millis() as u64,
                    timed_out = e.is_timeout(),
                    error = %e,
                    "Request to Alpaca failed"
                );
                return Err(RequestError::Network(e));
            }
        };

        let status = response.status();
        let (rate_limit_remaining, rate_limit_limit) =
            self.observe_rate_limits(endpoint, response.headers());

        self.metrics.record_request(endpoint, status.as_str(), duration.as_secs_f64());
        if status.as_u16() >= 400 {
            self.metrics.record_error(endpoint, ErrorType::Http);
        }

        info!(
            event_name = "alpaca.request.completed",
            event_domain = "alpaca",
            endpoint,
            duration_ms = duration.as_millis() as u64,
            status_code = status.as_u16(),
            rate_limit_remaining = ?rate_limit_remaining,
            "Response time: {}ms, Status: {}, Endpoint: {}",
            duration.as_millis(),
            status.as_u16(),
            endpoint
        );

        let body = match response.bytes().await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                self.metrics.record_error(endpoint, ErrorType::BodyRead);
                error!(
                    event_name = "alpaca.response.body_unreadable",
                    event_domain = "alpaca",
                    endpoint,
                    status_code = status.as_u16(),
                    error = %e,
                    "Failed to read response body"
                );
                return Err(RequestError::BodyRead(e));
            }
        };

        if status == StatusCode::OK {
            debug!(endpoint, "Success");
        } else {
            error!(
                event_name = "alpaca.response.error",
                event_domain = "alpaca",
                endpoint,
                status_code = status.as_u16(),
                body = body.as_str(),
                "Error body: {}",
                body
            );
        }

        Ok(RequestOutcome {
            status,
            duration,
            rate_limit_remaining,
            rate_limit_limit,
            body,
        })
    }

    /// Updates the rate limit gauges from the response headers.
    ///
    /// An unparseable remaining count is recorded and treated as zero; an
    /// unparseable limit is ignored.
    fn observe_rate_limits(
        &self,
        endpoint: &str,
        headers: &HeaderMap,
    ) -> (Option<i64>, Option<i64>) {
        let remaining = match parse_header(headers, REMAINING_HEADER) {
            RateLimitHeader::Absent => None,
            RateLimitHeader::Value(remaining) => Some(remaining),
            RateLimitHeader::Invalid(raw) => {
                self.metrics.record_error(endpoint, ErrorType::RateLimitParse);
                warn!(
                    event_name = "alpaca.rate_limit.unparseable",
                    event_domain = "alpaca",
                    endpoint,
                    header = REMAINING_HEADER,
                    value = raw.as_str(),
                    "Could not parse rate limit header, assuming 0 remaining"
                );
                Some(0)
            }
        };

        if let Some(remaining) = remaining {
            self.metrics.set_rate_limit_remaining(endpoint, remaining);
            if remaining < self.low_rate_limit_threshold {
                self.metrics.record_rate_limit_warning(endpoint);
                warn!(
                    event_name = "alpaca.rate_limit.low",
                    event_domain = "alpaca",
                    endpoint,
                    remaining,
                    threshold = self.low_rate_limit_threshold,
                    "Low rate limit on {}: {} calls remaining",
                    endpoint,
                    remaining
                );
            }
        }

        let limit = match parse_header(headers, LIMIT_HEADER) {
            RateLimitHeader::Value(limit) => {
                self.metrics.set_rate_limit_limit(endpoint, limit);
                Some(limit)
            }
            RateLimitHeader::Absent | RateLimitHeader::Invalid(_) => None,
        };

        (remaining, limit)
    }
}
