//! # Configuration
//!
//! Environment-sourced settings for the server, the database and the
//! freight provider.
//!
//! Values come from process environment variables (optionally seeded from
//! a `.env` file by `dotenvy`) layered over built-in defaults with the
//! `config` crate. Variable names are flat (`DB_HOST`, `SERVER_PORT`, ...).
//!
//! # Examples
//!
//! ```no_run
//! use freight_quote::infrastructure::config::AppConfig;
//!
//! let config = AppConfig::load()?;
//! println!("listening on {}", config.server.port);
//! # Ok::<(), freight_quote::infrastructure::config::ConfigError>(())
//! ```

use config::{Config, Environment};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default server port.
pub const DEFAULT_SERVER_PORT: u16 = 8080;

/// Default overall request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Default provider call timeout in milliseconds.
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 10_000;

/// Default maximum database pool size.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Default provider base URL.
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://sp.freterapido.com";

/// Default dispatcher postal code (home depot).
pub const DEFAULT_DISPATCHER_ZIPCODE: &str = "29161376";

/// Error raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying `config` crate failure (missing or malformed values).
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// A value parsed but is not acceptable.
    #[error("invalid configuration value for {key}: {message}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable compact lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "compact" | "" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?} (expected text or json)")),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listening port.
    pub port: u16,
    /// Upper bound for a whole request, in milliseconds.
    pub request_timeout_ms: u64,
}

/// PostgreSQL connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Host name.
    pub host: String,
    /// Port.
    pub port: u16,
    /// User name.
    pub user: String,
    /// Password.
    pub password: String,
    /// Database name.
    pub name: String,
    /// libpq `sslmode` value.
    pub ssl_mode: String,
    /// Maximum pool size.
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Builds the driver connection options field by field, so credentials
    /// never pass through URL parsing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `ssl_mode` is not a libpq mode.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(parse_ssl_mode(&self.ssl_mode)?))
    }
}

fn parse_ssl_mode(raw: &str) -> Result<PgSslMode, ConfigError> {
    raw.parse().map_err(|e: sqlx::Error| ConfigError::Invalid {
        key: "DB_SSLMODE",
        message: e.to_string(),
    })
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("name", &self.name)
            .field("ssl_mode", &self.ssl_mode)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Freight provider settings.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// API token.
    pub token: String,
    /// Platform code issued by the provider.
    pub platform_code: String,
    /// Shipper CNPJ (registered number).
    pub shipper_cnpj: String,
    /// Dispatcher postal code, as configured.
    pub dispatcher_zipcode: String,
    /// Per-call timeout in milliseconds.
    pub timeout_ms: u64,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .field("platform_code", &self.platform_code)
            .field("shipper_cnpj", &self.shipper_cnpj)
            .field("dispatcher_zipcode", &self.dispatcher_zipcode)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP server.
    pub server: ServerConfig,
    /// Database.
    pub database: DatabaseConfig,
    /// Freight provider.
    pub provider: ProviderConfig,
    /// Log output format.
    pub log_format: LogFormat,
}

/// Flat view of the recognized environment variables (lowercased).
#[derive(Debug, Deserialize)]
struct RawSettings {
    server_port: u16,
    request_timeout_ms: u64,
    db_host: String,
    db_port: u16,
    db_user: String,
    db_password: String,
    db_name: String,
    db_sslmode: String,
    db_max_connections: u32,
    frete_rapido_base_url: String,
    frete_rapido_token: String,
    frete_rapido_platform_code: String,
    frete_rapido_shipper_cnpj: String,
    frete_rapido_dispatcher_cep: String,
    frete_rapido_timeout_ms: u64,
    log_format: String,
}

impl AppConfig {
    /// Loads configuration from `.env` (if present) and the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed into its type.
    pub fn load() -> Result<Self, ConfigError> {
        // a missing .env file is normal outside development
        let _ = dotenvy::dotenv();
        Self::from_environment(Environment::default().ignore_empty(true))
    }

    /// Loads configuration from an explicit variable map instead of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed into its type.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_environment(
            Environment::default()
                .ignore_empty(true)
                .source(Some(vars)),
        )
    }

    fn from_environment(env: Environment) -> Result<Self, ConfigError> {
        let raw: RawSettings = Config::builder()
            .set_default("server_port", i64::from(DEFAULT_SERVER_PORT))?
            .set_default("request_timeout_ms", DEFAULT_REQUEST_TIMEOUT_MS)?
            .set_default("db_host", "localhost")?
            .set_default("db_port", 5432)?
            .set_default("db_user", "postgres")?
            .set_default("db_password", "postgres")?
            .set_default("db_name", "quote_api")?
            .set_default("db_sslmode", "disable")?
            .set_default("db_max_connections", DEFAULT_DB_MAX_CONNECTIONS)?
            .set_default("frete_rapido_base_url", DEFAULT_PROVIDER_BASE_URL)?
            .set_default("frete_rapido_token", "1d52a9b6b78cf07b08586152459a5c90")?
            .set_default("frete_rapido_platform_code", "5AKVkHqCn")?
            .set_default("frete_rapido_shipper_cnpj", "25438296000158")?
            .set_default("frete_rapido_dispatcher_cep", DEFAULT_DISPATCHER_ZIPCODE)?
            .set_default("frete_rapido_timeout_ms", DEFAULT_PROVIDER_TIMEOUT_MS)?
            .set_default("log_format", "text")?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        raw.try_into()
    }
}

impl TryFrom<RawSettings> for AppConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSettings) -> Result<Self, Self::Error> {
        let log_format = raw
            .log_format
            .parse()
            .map_err(|message| ConfigError::Invalid {
                key: "LOG_FORMAT",
                message,
            })?;

        parse_ssl_mode(&raw.db_sslmode)?;

        if raw.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_MS",
                message: "must be greater than zero".to_string(),
            });
        }
        if raw.frete_rapido_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "FRETE_RAPIDO_TIMEOUT_MS",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            server: ServerConfig {
                port: raw.server_port,
                request_timeout_ms: raw.request_timeout_ms,
            },
            database: DatabaseConfig {
                host: raw.db_host,
                port: raw.db_port,
                user: raw.db_user,
                password: raw.db_password,
                name: raw.db_name,
                ssl_mode: raw.db_sslmode,
                max_connections: raw.db_max_connections,
            },
            provider: ProviderConfig {
                base_url: raw.frete_rapido_base_url.trim_end_matches('/').to_string(),
                token: raw.frete_rapido_token,
                platform_code: raw.frete_rapido_platform_code,
                shipper_cnpj: raw.frete_rapido_shipper_cnpj,
                dispatcher_zipcode: raw.frete_rapido_dispatcher_cep,
                timeout_ms: raw.frete_rapido_timeout_ms,
            },
            log_format,
        })
    }
}
