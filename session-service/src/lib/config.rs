use std::env;
use std::time::Duration as StdDuration;

use chrono::Duration;
use chrono::Utc;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::auth::models::SessionSettings;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub database: DatabaseConfig,
    pub sessions: SessionsConfig,
    pub cookies: CookieConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionsConfig {
    pub ttl_hours: i64,
    pub operation_timeout_ms: u64,
    pub reap_interval_secs: u64,
}

impl SessionsConfig {
    /// # Errors
    /// * `ConfigError::Message` - `ttl_hours` is not a positive, representable duration
    pub fn settings(&self) -> Result<SessionSettings, ConfigError> {
        if self.ttl_hours <= 0 {
            return Err(ConfigError::Message(format!(
                "sessions.ttl_hours must be positive, got {}",
                self.ttl_hours
            )));
        }
        let session_ttl = Duration::try_hours(self.ttl_hours)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                ConfigError::Message(format!(
                    "sessions.ttl_hours is out of range: {}",
                    self.ttl_hours
                ))
            })?;

        Ok(SessionSettings {
            session_ttl,
            operation_timeout: StdDuration::from_millis(self.operation_timeout_ms),
        })
    }

    /// Reaper period, `None` when reaping is disabled.
    pub fn reap_interval(&self) -> Option<StdDuration> {
        (self.reap_interval_secs > 0).then(|| StdDuration::from_secs(self.reap_interval_secs))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    pub secure: bool,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, SESSIONS__TTL_HOURS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080_i64)?
            .set_default("store.backend", "postgres")?
            .set_default("database.url", "postgresql://localhost:5432/sessions")?
            .set_default("database.max_connections", 5_i64)?
            .set_default("sessions.ttl_hours", SessionSettings::DEFAULT_TTL_HOURS)?
            .set_default(
                "sessions.operation_timeout_ms",
                SessionSettings::DEFAULT_OPERATION_TIMEOUT_MS as i64,
            )?
            .set_default("sessions.reap_interval_secs", 3600_i64)?
            .set_default("cookies.secure", false)?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Self = configuration.try_deserialize()?;
        config.sessions.settings()?;

        Ok(config)
    }
}
