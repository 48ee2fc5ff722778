#![allow(dead_code)]

use std::sync::Arc;

use alpaca_monitor::alpaca::ApiClient;
use alpaca_monitor::config::{AlpacaConfig, Credentials, MonitorConfig, MonitorLoopConfig};
use alpaca_monitor::metrics::Metrics;
use alpaca_monitor::monitor::Monitor;
use alpaca_monitor::routes::create_router;
use alpaca_monitor::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request};

pub const PATHS: [&str; 4] = ["/v2/account", "/v2/positions", "/v2/orders", "/v2/assets"];

/// A config pointing at `base_url` with no pause between calls.
pub fn test_config(base_url: &str) -> MonitorConfig {
    MonitorConfig {
        bind_address: "127.0.0.1:0".to_string(),
        alpaca: AlpacaConfig {
            base_url: base_url.to_string(),
            endpoints: PATHS.iter().map(|p| p.to_string()).collect(),
            request_timeout_ms: 2_000,
            low_rate_limit_threshold: 20,
        },
        monitor: MonitorLoopConfig {
            interval_secs: 30,
            call_delay_ms: 0,
        },
        ..MonitorConfig::default()
    }
}

pub fn build_monitor(config: &MonitorConfig, metrics: Metrics) -> Monitor {
    let client = ApiClient::new(
        Credentials::new("PKTEST", "s3cret"),
        metrics,
        &config.alpaca,
    )
    .expect("client should build");
    Monitor::from_config(client, config)
}

pub fn build_app(config: MonitorConfig, metrics: Metrics) -> Router {
    create_router(AppState {
        config: Arc::new(config),
        metrics,
    })
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}

/// A loopback URL nothing is listening on.
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("address");
    drop(listener);
    format!("http://{}", addr)
}

