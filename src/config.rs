use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

const CONFIG_DIR: &str = "config";
const DEFAULT_ENV: &str = "development";
const DEFAULT_LOG_LEVEL: &str = "info";

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Tunables for the demand forecaster and replenishment planner.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForecastingConfig {
    /// Number of trailing days of order history fed into the forecaster
    #[serde(default = "default_window_days")]
    #[validate(range(min = 1, max = 365))]
    pub window_days: u32,

    /// Fixed supplier lead time applied to expected delivery dates
    #[serde(default = "default_lead_time_days")]
    #[validate(range(min = 1, max = 60))]
    pub lead_time_days: u32,

    /// Weeks of forecast demand a purchase order should cover
    #[serde(default = "default_coverage_weeks")]
    #[validate(range(min = 1, max = 12))]
    pub coverage_weeks: u32,

    /// Distinct observation days treated as a fully dense history
    #[serde(default = "default_dense_history_days")]
    #[validate(range(min = 1, max = 365))]
    pub dense_history_days: u32,

    /// Below this many distinct observation days the confidence is halved
    #[serde(default = "default_min_observation_days")]
    #[validate(range(min = 1, max = 30))]
    pub min_observation_days: u32,
}

fn default_window_days() -> u32 {
    14
}

fn default_lead_time_days() -> u32 {
    3
}

fn default_coverage_weeks() -> u32 {
    2
}

fn default_dense_history_days() -> u32 {
    14
}

fn default_min_observation_days() -> u32 {
    3
}

impl Default for ForecastingConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            lead_time_days: default_lead_time_days(),
            coverage_weeks: default_coverage_weeks(),
            dense_history_days: default_dense_history_days(),
            min_observation_days: default_min_observation_days(),
        }
    }
}

/// Connection pool sizing and timeouts, consumed by [`crate::db::DbConfig`].
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DatabasePoolConfig {
    #[serde(default = "default_max_connections")]
    #[validate(range(min = 1, max = 1024))]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_acquire_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub acquire_timeout_secs: u64,

    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_acquire_timeout_secs() -> u64 {
    8
}

fn default_idle_timeout_secs() -> u64 {
    600
}

impl Default for DatabasePoolConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
        }
    }
}

/// Bounds applied to list endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaginationConfig {
    /// Page size when the caller does not ask for one
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 500))]
    pub default_per_page: u64,

    /// Hard ceiling; larger requests are clamped, not rejected
    #[serde(default = "default_max_per_page")]
    #[validate(range(min = 1, max = 1000))]
    pub max_per_page: u64,
}

fn default_per_page() -> u64 {
    20
}

fn default_max_per_page() -> u64 {
    100
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

fn default_event_channel_capacity() -> usize {
    1024
}

/// Application configuration, deserialized from layered config sources.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment (development, staging, production)
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Allow permissive CORS fallback
    #[serde(default)]
    pub cors_allow_any_origin: bool,

    /// Forecasting and replenishment tunables
    #[serde(default)]
    #[validate]
    pub forecasting: ForecastingConfig,

    /// Connection pool sizing and timeouts
    #[serde(default)]
    #[validate]
    pub database: DatabasePoolConfig,

    /// List endpoint page-size bounds
    #[serde(default)]
    #[validate]
    pub pagination: PaginationConfig,

    /// Capacity of the in-process domain event channel
    #[serde(default = "default_event_channel_capacity")]
    #[validate(range(min = 1))]
    pub event_channel_capacity: usize,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parsed list of explicitly allowed CORS origins.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Constraints that cannot be expressed via derive attributes.
    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.is_production() && self.cors_allow_any_origin {
            errors.add(
                "cors_allow_any_origin",
                ValidationError::new("cors_any_origin_in_production"),
            );
        }

        if self.port < 1024 {
            errors.add("port", ValidationError::new("privileged_port"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Initializes tracing using the provided log level as the default filter.
/// `RUST_LOG` takes precedence when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::fmt;

    let default_directive = format!("tablestack_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt().with_env_filter(filter_directive).json().try_init();
    } else {
        let _ = fmt().with_env_filter(filter_directive).try_init();
    }
}

/// Loads application configuration.
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://tablestack.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", 8080)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .set_default("auto_migrate", true)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            host: "127.0.0.1".into(),
            port: 8080,
            environment: "development".into(),
            log_level: "info".into(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origins: None,
            cors_allow_any_origin: false,
            forecasting: ForecastingConfig::default(),
            database: DatabasePoolConfig::default(),
            pagination: PaginationConfig::default(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    #[test]
    fn forecasting_defaults_match_documented_values() {
        let cfg = ForecastingConfig::default();
        assert_eq!(cfg.window_days, 14);
        assert_eq!(cfg.lead_time_days, 3);
        assert_eq!(cfg.coverage_weeks, 2);
        assert_eq!(cfg.dense_history_days, 14);
        assert_eq!(cfg.min_observation_days, 3);
    }

    #[test]
    fn pool_pagination_and_channel_defaults_are_sane() {
        let cfg = base_config();
        assert_eq!(cfg.database.max_connections, 10);
        assert_eq!(cfg.pagination.default_per_page, 20);
        assert_eq!(cfg.pagination.max_per_page, 100);
        assert_eq!(cfg.event_channel_capacity, 1024);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn cors_origins_parses_comma_separated_list() {
        let mut cfg = base_config();
        cfg.cors_allowed_origins =
            Some("https://app.example.com, https://admin.example.com".into());
        assert_eq!(
            cfg.cors_origins(),
            vec![
                "https://app.example.com".to_string(),
                "https://admin.example.com".to_string()
            ]
        );
    }

    #[test]
    fn production_rejects_any_origin_cors() {
        let mut cfg = base_config();
        cfg.environment = "production".into();
        cfg.cors_allow_any_origin = true;
        assert!(cfg.validate_additional_constraints().is_err());
    }

    #[test]
    fn privileged_port_is_rejected() {
        let mut cfg = base_config();
        cfg.port = 80;
        assert!(cfg.validate_additional_constraints().is_err());
    }
}
