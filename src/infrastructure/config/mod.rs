use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::analysis_config::AnalysisConfig;
use crate::domain::error::Result;

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_VAR: &str = "REPORT_AGENT_CONFIG";
pub const ENV_PREFIX: &str = "REPORT_AGENT_";
const DEFAULT_CONFIG_FILE: &str = "report-agent.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    /// Largest accepted upload body, in bytes
    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,

    #[validate(nested)]
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_bytes: 10 * 1024 * 1024,
            log_filter: "info".to_string(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load `.env`, then merge defaults, the TOML file and `REPORT_AGENT_*` variables.
    pub fn load() -> Result<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment(config_path()))
    }

    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn bind_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
