//! Application startup and server initialization.
//!
//! This module wires the metrics registry, the Alpaca client and the
//! monitoring loop together, then serves the scrape and health endpoints.

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

use crate::alpaca::ApiClient;
use crate::config::{Credentials, MonitorConfig};
use crate::error::StartupError;
use crate::metrics::Metrics;
use crate::monitor::Monitor;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// Binds the listener before the monitoring loop is spawned, so a bad bind
/// address fails startup without a single brokerage call. Serves until
/// Ctrl-C, then stops the loop.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the server fails to
/// bind to the configured address, or the server fails while running.
pub async fn run(config: Arc<MonitorConfig>, credentials: Credentials) -> Result<(), StartupError> {
    let metrics = Metrics::new();
    let client = ApiClient::new(credentials, metrics.clone(), &config.alpaca)?;
    let monitor = Monitor::from_config(client, &config);

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

    info!(
        event_name = "server.started",
        event_domain = "server",
        bind_address = config.bind_address.as_str(),
        endpoints = monitor.endpoints().len(),
        "Alpaca Performance Monitor started, metrics available at http://{}/metrics",
        config.bind_address
    );

    let (stop_tx, stop_rx) = watch::channel(false);
    let monitor_task = tokio::spawn(async move { monitor.run(stop_rx).await });

    let state = AppState {
        config: config.clone(),
        metrics,
    };
    let app = routes::create_router(state);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve);

    let _ = stop_tx.send(true);
    if let Err(e) = monitor_task.await {
        error!("Monitoring task ended abnormally: {}", e);
    }
    served
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Unable to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
