//! Process health reporting.
//!
//! A health check never fails: an unreachable store is reported as
//! `db_connected: false` with the (sanitized) reason.

use crate::database::DocumentStore;
use crate::security::sanitize_error_message;
use crate::telemetry::{MetricsSnapshot, SharedMetrics};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Overall status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Snapshot returned by the health endpoint. Recomputed on every request.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: HealthState,
    pub db_connected: bool,
    pub db_name: String,
    pub collection: String,
    /// `None` when the store could not be reached.
    pub document_count: Option<u64>,
    pub server_version: String,
    pub pid: u32,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub metrics: MetricsSnapshot,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// Answers health queries against the shared store.
pub struct HealthReporter<S> {
    store: Arc<S>,
    metrics: SharedMetrics,
}

impl<S> Clone for HealthReporter<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: DocumentStore> HealthReporter<S> {
    pub fn new(store: Arc<S>, metrics: SharedMetrics) -> Self {
        Self { store, metrics }
    }

    /// Ping the store and count the collection.
    pub async fn check(&self) -> HealthStatus {
        self.metrics.record_health_check();

        let probe = async {
            self.store.ping().await?;
            self.store.count_documents().await
        };

        let (document_count, error) = match probe.await {
            Ok(count) => {
                debug!("Health check passed ({} documents)", count);
                (Some(count), None)
            }
            Err(e) => {
                self.metrics.record_connection_error();
                warn!("Health check failed: {}", e.render());
                (None, Some(sanitize_error_message(&e.to_string())))
            }
        };

        let connected = document_count.is_some();
        HealthStatus {
            status: if connected {
                HealthState::Healthy
            } else {
                HealthState::Unhealthy
            },
            db_connected: connected,
            db_name: self.store.database_name().to_string(),
            collection: self.store.collection_name().to_string(),
            document_count,
            server_version: env!("CARGO_PKG_VERSION").to_string(),
            pid: std::process::id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            error,
            metrics: self.metrics.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::mock::{MockFailure, MockStore};
    use crate::telemetry::new_shared_metrics;

    #[tokio::test]
    async fn test_reachable_store() {
        let store = Arc::new(MockStore::with_financials());
        let reporter = HealthReporter::new(store.clone(), new_shared_metrics());

        let status = reporter.check().await;
        assert!(status.is_healthy());
        assert!(status.db_connected);
        assert_eq!(status.document_count, Some(store.count_documents().await.unwrap()));
        assert_eq!(status.db_name, "stock_data");
        assert_eq!(status.collection, "detailed_financials");
        assert!(status.error.is_none());
        assert_eq!(status.metrics.health_checks, 1);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_reported_not_raised() {
        let reporter = HealthReporter::new(
            Arc::new(MockStore::failing(MockFailure::Unreachable)),
            new_shared_metrics(),
        );

        let status = reporter.check().await;
        assert!(!status.is_healthy());
        assert!(!status.db_connected);
        assert_eq!(status.document_count, None);

        let error = status.error.as_deref().unwrap();
        assert!(error.contains("No available servers"));
        assert!(!error.contains("secret"));
        assert_eq!(status.metrics.connection_errors, 1);
    }

    #[tokio::test]
    async fn test_status_json_shape() {
        let reporter = HealthReporter::new(
            Arc::new(MockStore::with_financials()),
            new_shared_metrics(),
        );
        let json = serde_json::to_value(reporter.check().await).unwrap();

        assert_eq!(json["status"], "healthy");
        assert_eq!(json["db_connected"], true);
        assert_eq!(json["db_name"], "stock_data");
        assert_eq!(json["collection"], "detailed_financials");
        assert_eq!(json["document_count"], 6);
        assert!(json.get("error").is_none());
    }
}
