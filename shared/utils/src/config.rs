use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{FlexifloError, FlexifloResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size: usize,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Storage connection string. There is no default: the server refuses
    /// to start without one.
    pub mongodb_url: Option<String>,
    /// Used when the connection string names no database.
    pub database_name: String,
    pub connection_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub metrics_enabled: bool,
    pub prometheus_namespace: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("server.max_request_size", defaults.server.max_request_size as i64)?
            .set_default("server.timeout_seconds", defaults.server.timeout_seconds as i64)?
            .set_default("database.database_name", defaults.database.database_name)?
            .set_default(
                "database.connection_timeout_seconds",
                defaults.database.connection_timeout_seconds as i64,
            )?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("monitoring.metrics_enabled", defaults.monitoring.metrics_enabled)?
            .set_default(
                "monitoring.prometheus_namespace",
                defaults.monitoring.prometheus_namespace,
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("FLEXIFLO").separator("__"))
            // Variable names used by existing deployments
            .set_override_option("server.port", env::var("PORT").ok())?
            .set_override_option("database.mongodb_url", env::var("MONGO_URI").ok())?;

        config.build()?.try_deserialize()
    }
}

impl DatabaseConfig {
    pub fn require_url(&self) -> FlexifloResult<&str> {
        self.mongodb_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                FlexifloError::configuration(
                    "MONGO_URI (or FLEXIFLO__DATABASE__MONGODB_URL) is not defined",
                )
            })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_request_size: 2 * 1024 * 1024, // 2MB
                timeout_seconds: 30,
            },
            database: DatabaseConfig {
                mongodb_url: None,
                database_name: "flexiflo".to_string(),
                connection_timeout_seconds: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
                file_path: None,
            },
            monitoring: MonitoringConfig {
                metrics_enabled: true,
                prometheus_namespace: "flexiflo".to_string(),
            },
        }
    }
}
