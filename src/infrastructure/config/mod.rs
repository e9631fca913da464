use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::domain::data_source::DataSource;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";
pub const ENV_PREFIX: &str = "DASHBOARD_";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    pub data_source: DataSource,
    #[validate(nested)]
    pub llm: LLMConfig,
    /// Fetch the configured source as soon as the server starts.
    pub load_on_startup: bool,
}

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_CONFIG_FILE)
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Defaults <- TOML file <- `DASHBOARD_*` environment, after reading `.env`.
    pub fn load(&self) -> Result<AppConfig> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                warn!(error = %err, "Ignoring unreadable .env file");
            }
        }

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(&self.path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config = Self::extract(figment)?;
        info!(
            config_file = %self.path.display(),
            data_source = %config.data_source.describe(),
            generation_enabled = config.llm.is_enabled(),
            "Loaded configuration"
        );
        Ok(config)
    }

    fn extract(figment: Figment) -> Result<AppConfig> {
        let mut config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        if config.llm.api_key.is_none() {
            config.llm.api_key = std::env::var("GEMINI_API_KEY").ok();
        }

        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        if config.data_source != DataSource::Unset {
            config.data_source.validate()?;
        }

        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config =
            ConfigService::extract(Figment::from(Serialized::defaults(AppConfig::default())))
                .unwrap();
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.data_source, DataSource::Unset);
        assert!(!config.load_on_startup);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let toml = r#"
            load_on_startup = true

            [server]
            port = 8088

            [data_source]
            kind = "csv"
            url = "https://docs.example.com/sheet/export?format=csv"
        "#;
        let figment =
            Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::string(toml));
        let config = ConfigService::extract(figment).unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(config.load_on_startup);
        assert!(matches!(config.data_source, DataSource::Csv { .. }));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::string("[server]\nport = 0\n"));
        assert!(matches!(
            ConfigService::extract(figment),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_bad_source_url_rejected() {
        let figment = Figment::from(Serialized::defaults(AppConfig::default())).merge(
            Toml::string("[data_source]\nkind = \"json\"\nurl = \"not a url\"\n"),
        );
        assert!(ConfigService::extract(figment).is_err());
    }
}
