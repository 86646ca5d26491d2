//! Opening the long-lived MongoDB handle.

use super::store::{DocumentStore, MongoStore};
use crate::config::DatabaseConfig;
use crate::error::ServerError;
use crate::security::redact_uri;
use mongodb::options::ClientOptions;
use mongodb::Client;
use tracing::{error, info};

/// Create the store from configuration.
///
/// The driver connects lazily, so an unreachable server does not fail
/// startup: the probe result is logged and health checks report it until the
/// server comes back. Only an unusable connection string is an error.
pub async fn connect(config: &DatabaseConfig) -> Result<MongoStore, ServerError> {
    info!(
        "Connecting to {} (database: {}, collection: {})",
        redact_uri(&config.uri),
        config.database,
        config.collection
    );

    let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
        ServerError::config(format!(
            "Invalid MONGO_URI '{}': {}",
            redact_uri(&config.uri),
            e
        ))
    })?;
    options.app_name = Some(config.application_name.clone());
    options.server_selection_timeout = Some(config.server_selection_timeout);

    let client = Client::with_options(options)
        .map_err(|e| ServerError::connection_with_source("Failed to create MongoDB client", e))?;

    let store = MongoStore::new(
        client,
        &config.database,
        &config.collection,
        config.query_timeout,
    );

    match probe(&store).await {
        Ok(count) => info!(
            "Connected to MongoDB. Collection '{}' has {} documents",
            config.collection, count
        ),
        Err(e) => error!("Failed to connect to MongoDB: {}", e.render()),
    }

    Ok(store)
}

async fn probe(store: &MongoStore) -> Result<u64, ServerError> {
    store.ping().await?;
    store.count_documents().await
}
