use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;

/// Main config for the monitor: where to listen, what to poll, how often.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct MonitorConfig {
    pub bind_address: String,
    pub alpaca: AlpacaConfig,
    pub monitor: MonitorLoopConfig,
    pub logging: LoggingConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            bind_address: "0.0.0.0:2112".to_string(),
            alpaca: AlpacaConfig::default(),
            monitor: MonitorLoopConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// The brokerage API to poll.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct AlpacaConfig {
    pub base_url: String,
    /// Polled in this order every cycle. Paths are appended to `base_url`;
    /// absolute `http(s)://` URLs are used as given.
    pub endpoints: Vec<String>,
    pub request_timeout_ms: u64,
    /// Remaining-call count below which a warning is raised.
    pub low_rate_limit_threshold: i64,
}

impl Default for AlpacaConfig {
    fn default() -> Self {
        AlpacaConfig {
            base_url: "https://paper-api.alpaca.markets".to_string(),
            endpoints: vec![
                "/v2/account".to_string(),
                "/v2/positions".to_string(),
                "/v2/orders".to_string(),
                "/v2/assets".to_string(),
            ],
            request_timeout_ms: 10_000,
            low_rate_limit_threshold: 20,
        }
    }
}

impl AlpacaConfig {
    /// Full endpoint URLs, in polling order.
    pub fn endpoint_urls(&self) -> Vec<String> {
        let base = self.base_url.trim_end_matches('/');
        self.endpoints
            .iter()
            .map(|path| {
                if path.starts_with("http://") || path.starts_with("https://") {
                    path.clone()
                } else {
                    format!("{}/{}", base, path.trim_start_matches('/'))
                }
            })
            .collect()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Timing of the polling loop.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct MonitorLoopConfig {
    pub interval_secs: u64,
    /// Pause after every call, independent of the brokerage's own limits.
    pub call_delay_ms: u64,
}

impl Default for MonitorLoopConfig {
    fn default() -> Self {
        MonitorLoopConfig {
            interval_secs: 30,
            call_delay_ms: 1_000,
        }
    }
}

impl MonitorLoopConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn call_delay(&self) -> Duration {
        Duration::from_millis(self.call_delay_ms)
    }
}

/// Defaults, then "config.yaml" in the current directory, then `MONITOR_*` env vars.
pub fn figment() -> Figment {
    Figment::from(Serialized::defaults(MonitorConfig::default()))
        .merge(Yaml::file("./config.yaml"))
        .merge(Env::prefixed("MONITOR_").split("__"))
}

/// Load the layered config, exiting the process if it cannot be parsed.
pub fn load_config() -> MonitorConfig {
    match figment().extract::<MonitorConfig>() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(MonitorConfig);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error rendering configuration schema: {}", e),
    }
}
