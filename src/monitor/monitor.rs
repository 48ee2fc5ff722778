use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::{info, warn};

use crate::alpaca::ApiClient;
use crate::config::MonitorConfig;
use crate::metrics::{Metrics, MetricsRecorder};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Tally of one pass over the endpoint list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Responses with a status below 400.
    pub succeeded: usize,
    /// Responses with a status of 400 or above.
    pub http_errors: usize,
    /// Calls that produced no usable response.
    pub failed: usize,
}

impl CycleReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.http_errors + self.failed
    }
}

/// Polls a fixed endpoint list, one call at a time, every `interval`.
pub struct Monitor<M: MetricsRecorder = Metrics> {
    client: ApiClient<M>,
    endpoints: Vec<String>,
    interval: Duration,
    call_delay: Duration,
}

impl<M: MetricsRecorder> Monitor<M> {
    pub fn new(
        client: ApiClient<M>,
        endpoints: Vec<String>,
        interval: Duration,
        call_delay: Duration,
    ) -> Self {
        Monitor {
            client,
            endpoints,
            interval,
            call_delay,
        }
    }

    pub fn from_config(client: ApiClient<M>, config: &MonitorConfig) -> Self {
        Self::new(
            client,
            config.alpaca.endpoint_urls(),
            config.monitor.interval(),
            config.monitor.call_delay(),
        )
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Runs a cycle every interval until `stop` carries `true` or its sender is dropped.
    ///
    /// The first cycle starts one interval after the call. A stop request is
    /// honoured while waiting for the next tick and after a cycle finishes.
    pub async fn run(&self, mut stop: watch::Receiver<bool>) {
        let period = if self.interval < MIN_INTERVAL {
            warn!(
                interval_ms = self.interval.as_millis() as u64,
                "Monitoring interval too small, using 1ms"
            );
            MIN_INTERVAL
        } else {
            self.interval
        };

        info!(
            event_name = "monitor.started",
            event_domain = "monitor",
            endpoints = self.endpoints.len(),
            interval_secs = period.as_secs_f64(),
            call_delay_ms = self.call_delay.as_millis() as u64,
            "Alpaca monitoring started"
        );

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *stop.borrow_and_update() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }
            self.run_cycle().await;
        }

        info!(
            event_name = "monitor.stopped",
            event_domain = "monitor",
            "Alpaca monitoring stopped"
        );
    }

    /// Calls every endpoint once, in order, pausing `call_delay` after each call.
    pub async fn run_cycle(&self) -> CycleReport {
        info!(
            event_name = "monitor.cycle.started",
            event_domain = "monitor",
            endpoints = self.endpoints.len(),
            "Monitoring cycle started"
        );
        let started = Instant::now();
        let mut report = CycleReport::default();

        for endpoint in &self.endpoints {
            match self.client.make_request(endpoint).await {
                Ok(outcome) if outcome.status.as_u16() < 400 => report.succeeded += 1,
                Ok(_) => report.http_errors += 1,
                Err(_) => report.failed += 1,
            }
            sleep(self.call_delay).await;
        }

        info!(
            event_name = "monitor.cycle.completed",
            event_domain = "monitor",
            succeeded = report.succeeded,
            http_errors = report.http_errors,
            failed = report.failed,
            duration_ms = started.elapsed().as_millis() as u64,
            "Monitoring cycle complete"
        );
        report
    }
}
