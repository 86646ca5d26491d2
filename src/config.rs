//! Configuration management for the Stock Data MCP Server.
//!
//! Configuration is loaded from environment variables following the 12-factor app pattern.

use crate::constants::{
    APP_NAME, DEFAULT_COLLECTION_NAME, DEFAULT_DB_NAME, DEFAULT_DRAIN_TIMEOUT_SECS,
    DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT, DEFAULT_LOG_LEVEL, DEFAULT_MONGO_URI,
    DEFAULT_QUERY_TIMEOUT, DEFAULT_QUERY_TIMEOUT_SECS, DEFAULT_SERVER_SELECTION_TIMEOUT,
    DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
};
use crate::error::ServerError;
use crate::security::{redact_uri, validate_collection_name, validate_database_name};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection configuration
    pub database: DatabaseConfig,

    /// Health listener configuration
    pub http: HttpConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Time allowed for in-flight work after a shutdown signal
    pub shutdown_drain_timeout: Duration,
}

/// Database connection configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// MongoDB connection string (may carry credentials)
    pub uri: String,

    /// Database holding the financial records
    pub database: String,

    /// Collection exposed by the tool and the resource
    pub collection: String,

    /// How long the driver may look for a suitable server
    pub server_selection_timeout: Duration,

    /// Upper bound on every individual store operation
    pub query_timeout: Duration,

    /// Application name sent to MongoDB
    pub application_name: String,
}

// Manual impl so the connection string never reaches a log line unredacted.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("uri", &redact_uri(&self.uri))
            .field("database", &self.database)
            .field("collection", &self.collection)
            .field("server_selection_timeout", &self.server_selection_timeout)
            .field("query_timeout", &self.query_timeout)
            .field("application_name", &self.application_name)
            .finish()
    }
}

/// Health listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Start the listener at all
    pub enabled: bool,

    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level for this crate's targets (`RUST_LOG` takes precedence)
    pub level: LogLevel,
}

/// Log level accepted in `LOG_LEVEL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Level name understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ServerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Python-style names (WARNING, CRITICAL) are accepted too
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" | "critical" | "fatal" => Ok(LogLevel::Error),
            other => Err(ServerError::config(format!(
                "Invalid LOG_LEVEL '{}'. Valid levels: trace, debug, info, warn, error",
                other
            ))),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// All variables are optional:
    /// - `MONGO_URI`: Connection string (default: `mongodb://localhost:27017/`)
    /// - `DB_NAME`: Database name (default: `stock_data`)
    /// - `COLLECTION_NAME`: Collection name (default: `detailed_financials`)
    /// - `HOST`: Health listener host (default: `127.0.0.1`)
    /// - `PORT`: Health listener port (default: 8000)
    /// - `LOG_LEVEL`: trace, debug, info, warn, error (default: info)
    /// - `MONGO_SERVER_SELECTION_TIMEOUT`: Seconds (default: 5)
    /// - `MONGO_QUERY_TIMEOUT`: Seconds per store operation (default: 30)
    /// - `HEALTH_HTTP_ENABLED`: Start the health listener (default: true)
    /// - `SHUTDOWN_DRAIN_TIMEOUT`: Seconds (default: 10)
    pub fn from_env() -> Result<Self, ServerError> {
        let uri = env_or("MONGO_URI", DEFAULT_MONGO_URI);
        if !uri.starts_with("mongodb://") && !uri.starts_with("mongodb+srv://") {
            return Err(ServerError::config(format!(
                "MONGO_URI must start with mongodb:// or mongodb+srv:// (got '{}')",
                redact_uri(&uri)
            )));
        }

        let database = env_or("DB_NAME", DEFAULT_DB_NAME);
        validate_database_name(&database)?;

        let collection = env_or("COLLECTION_NAME", DEFAULT_COLLECTION_NAME);
        validate_collection_name(&database, &collection)?;

        let server_selection_secs = parse_env(
            "MONGO_SERVER_SELECTION_TIMEOUT",
            DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
        )?;
        let query_timeout_secs = parse_env("MONGO_QUERY_TIMEOUT", DEFAULT_QUERY_TIMEOUT_SECS)?;
        if server_selection_secs == 0 || query_timeout_secs == 0 {
            return Err(ServerError::config("Timeouts must be at least 1 second"));
        }

        let host = env_or("HOST", DEFAULT_HTTP_HOST);
        let port = parse_env("PORT", DEFAULT_HTTP_PORT)?;
        let enabled = std::env::var("HEALTH_HTTP_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        let level = match std::env::var("LOG_LEVEL") {
            Ok(v) => v.parse()?,
            Err(_) => LogLevel::default(),
        };

        let drain_secs = parse_env("SHUTDOWN_DRAIN_TIMEOUT", DEFAULT_DRAIN_TIMEOUT_SECS)?;

        Ok(Config {
            database: DatabaseConfig {
                uri,
                database,
                collection,
                server_selection_timeout: Duration::from_secs(server_selection_secs),
                query_timeout: Duration::from_secs(query_timeout_secs),
                application_name: APP_NAME.to_string(),
            },
            http: HttpConfig {
                enabled,
                host,
                port,
            },
            logging: LoggingConfig { level },
            shutdown_drain_timeout: Duration::from_secs(drain_secs),
        })
    }

    /// Name of the single query tool, `query_<collection>`.
    pub fn tool_name(&self) -> String {
        format!("query_{}", self.database.collection)
    }

    /// Name of the collection resource, `mongo_<collection>`.
    pub fn resource_name(&self) -> String {
        format!("mongo_{}", self.database.collection)
    }

    /// URI of the collection resource, `mongodb://<collection>`.
    pub fn resource_uri(&self) -> String {
        format!("mongodb://{}", self.database.collection)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DB_NAME.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            server_selection_timeout: DEFAULT_SERVER_SELECTION_TIMEOUT,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            application_name: APP_NAME.to_string(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.parse().unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            shutdown_drain_timeout: Duration::from_secs(DEFAULT_DRAIN_TIMEOUT_SECS),
        }
    }
}

/// Read a string variable, falling back to a default when unset or blank.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse a variable, falling back to a default when unset; garbage is an error.
fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T, ServerError> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map_err(|_| ServerError::config(format!("{} has an invalid value '{}'", key, v))),
        Err(_) => Ok(default),
    }
}
