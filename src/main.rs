use std::sync::Arc;

use alpaca_monitor::config::{self, Credentials};
use alpaca_monitor::error::StartupError;
use alpaca_monitor::startup;
use alpaca_monitor::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() {
    if std::env::args().skip(1).any(|arg| arg == "--print-schema") {
        config::print_schema();
        return;
    }

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("{}", StartupError::from(e));
        std::process::exit(1);
    }

    let config = config::load_config();
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // Credentials are checked before anything touches the network.
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = startup::run(Arc::new(config), credentials).await {
        error!("{}", e);
        std::process::exit(1);
    }
}
