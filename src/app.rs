use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;

pub async fn run() -> std::io::Result<()> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            init_tracing("info");
            error!("{}", err);
            return Err(std::io::Error::other(err.to_string()));
        }
    };

    init_tracing(&config.log_filter);
    info!(
        max_upload_bytes = config.max_upload_bytes,
        deviation = ?config.analysis.deviation,
        forecast_horizon = config.analysis.forecast_horizon,
        "Configuration loaded"
    );

    crate::interfaces::http::start_server(&config)?.await
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
