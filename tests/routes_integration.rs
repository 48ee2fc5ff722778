mod common;

use alpaca_monitor::metrics::{ErrorType, Metrics, MetricsRecorder};
use axum::body::to_bytes;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{build_app, get, test_config};

#[tokio::test]
async fn health_reports_service_name() {
    let app = build_app(test_config("http://127.0.0.1:1"), Metrics::new());

    let response = app.oneshot(get("/health")).await.expect("request should succeed");
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let body: Value = serde_json::from_slice(&body).expect("body should be JSON");
    assert_eq!(body, json!({"status": "healthy", "service": "alpaca-monitor"}));
}

#[tokio::test]
async fn health_uses_configured_service_name() {
    let mut config = test_config("http://127.0.0.1:1");
    config.logging.service_name = "paper-desk-monitor".to_string();
    let app = build_app(config, Metrics::new());

    let response = app.oneshot(get("/health")).await.expect("request should succeed");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let body: Value = serde_json::from_slice(&body).expect("body should be JSON");
    assert_eq!(body["service"], "paper-desk-monitor");
}

#[tokio::test]
async fn metrics_exposes_recorded_series_as_prometheus_text() {
    let metrics = Metrics::new();
    let endpoint = "https://paper-api.alpaca.markets/v2/orders";
    metrics.record_request(endpoint, "500", 0.2);
    metrics.record_error(endpoint, ErrorType::Http);
    metrics.set_rate_limit_remaining(endpoint, 15);

    let app = build_app(test_config("http://127.0.0.1:1"), metrics);
    let response = app.oneshot(get("/metrics")).await.expect("request should succeed");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "text/plain; version=0.0.4; charset=utf-8"
    );
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    let text = String::from_utf8(body.to_vec()).expect("metrics should be UTF-8");

    assert!(text.contains("# TYPE alpaca_api_request_duration_seconds histogram"));
    assert!(text.contains(&format!(
        "alpaca_api_requests_total{{endpoint=\"{}\",status_code=\"500\"}} 1",
        endpoint
    )));
    assert!(text.contains(&format!(
        "alpaca_api_errors_total{{endpoint=\"{}\",error_type=\"http_error\"}} 1",
        endpoint
    )));
    assert!(text.contains(&format!(
        "alpaca_rate_limit_remaining{{endpoint=\"{}\"}} 15",
        endpoint
    )));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = build_app(test_config("http://127.0.0.1:1"), Metrics::new());

    let response = app.oneshot(get("/v2/account")).await.expect("request should succeed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
