//! MCP server struct definition and initialization.

use crate::config::Config;
use crate::database::{connect, DocumentStore, MongoStore};
use crate::error::ServerError;
use crate::health::HealthReporter;
use crate::telemetry::{new_shared_metrics, SharedMetrics};
use std::sync::Arc;

/// The Stock Data MCP Server instance.
///
/// The server is cloned per request by the transport, but the store handle
/// and metrics are shared via `Arc`. It provides:
///
/// - **Resources**: the configured collection, first page of documents
/// - **Tools**: `query_<collection>` for filtered, bounded reads
///
/// The store is injected, so tests run the same handlers against an
/// in-memory implementation.
pub struct StockDataMcpServer<S = MongoStore> {
    /// Configuration.
    pub(crate) config: Arc<Config>,

    /// The single long-lived store handle.
    pub(crate) store: Arc<S>,

    /// Server metrics for telemetry.
    pub(crate) metrics: SharedMetrics,
}

impl<S> Clone for StockDataMcpServer<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            store: self.store.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl StockDataMcpServer<MongoStore> {
    /// Create a new server instance connected to MongoDB.
    ///
    /// An unreachable server is not fatal here; see [`connect`].
    pub async fn new(config: Config) -> Result<Self, ServerError> {
        let store = connect(&config.database).await?;
        Ok(Self::with_store(config, store))
    }

    /// Create a server from environment variables.
    pub async fn from_env() -> Result<Self, ServerError> {
        let config = Config::from_env()?;
        Self::new(config).await
    }
}

impl<S: DocumentStore> StockDataMcpServer<S> {
    /// Create a server around an already opened store.
    pub fn with_store(config: Config, store: S) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            metrics: new_shared_metrics(),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &SharedMetrics {
        &self.metrics
    }

    /// Health reporter sharing this server's store and metrics.
    pub fn health_reporter(&self) -> HealthReporter<S> {
        HealthReporter::new(self.store.clone(), self.metrics.clone())
    }

    /// Name of the exposed collection.
    pub fn collection_name(&self) -> &str {
        &self.config.database.collection
    }
}
