//! Bounded label values for the error counter.

use std::fmt;

/// The closed set of `error_type` label values on `alpaca_api_errors_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    RequestCreation,
    Network,
    RateLimitParse,
    Http,
    BodyRead,
}

impl ErrorType {
    pub const ALL: [ErrorType; 5] = [
        ErrorType::RequestCreation,
        ErrorType::Network,
        ErrorType::RateLimitParse,
        ErrorType::Http,
        ErrorType::BodyRead,
    ];

    /// The label value exposed to Prometheus.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::RequestCreation => "request_creation_error",
            ErrorType::Network => "network_error",
            ErrorType::RateLimitParse => "rate_limit_parse_error",
            ErrorType::Http => "http_error",
            ErrorType::BodyRead => "body_read_error",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorType;
    use std::collections::HashSet;

    #[test]
    fn label_values_are_distinct_and_suffixed() {
        let labels: HashSet<&str> = ErrorType::ALL.iter().map(ErrorType::as_str).collect();
        assert_eq!(labels.len(), ErrorType::ALL.len());
        assert!(labels.iter().all(|l| l.ends_with("_error")));
    }
}
