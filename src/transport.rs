//! Transports beside the MCP stdio channel.
//!
//! The MCP protocol itself is served over stdio by `rmcp`. This module adds
//! the HTTP health listener, which requires the `http` feature flag.

/// HTTP health listener (only available with `http` feature).
///
/// Endpoints:
/// - `/health` - Health status as JSON, 200 when healthy, 503 otherwise
/// - `/` - Same as `/health`
#[cfg(feature = "http")]
pub mod http_server {
    use crate::config::HttpConfig;
    use crate::database::DocumentStore;
    use crate::health::HealthReporter;
    use crate::shutdown::SharedShutdownController;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use tower_http::trace::TraceLayer;
    use tracing::info;

    /// Build the health router.
    pub fn health_router<S: DocumentStore>(reporter: HealthReporter<S>) -> Router {
        Router::new()
            .route("/health", get(health_handler::<S>))
            .route("/", get(health_handler::<S>))
            .layer(TraceLayer::new_for_http())
            .with_state(reporter)
    }

    /// Serve the health listener until the shutdown controller fires.
    pub async fn start_health_server<S: DocumentStore>(
        reporter: HealthReporter<S>,
        config: &HttpConfig,
        shutdown_controller: SharedShutdownController,
    ) -> Result<(), anyhow::Error> {
        let addr = format!("{}:{}", config.host, config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Health endpoint: http://{}/health", addr);

        let mut shutdown_signal = shutdown_controller.signal();
        axum::serve(listener, health_router(reporter))
            .with_graceful_shutdown(async move {
                shutdown_signal.recv().await;
                info!("Health listener received shutdown signal");
            })
            .await?;

        Ok(())
    }

    async fn health_handler<S: DocumentStore>(
        State(reporter): State<HealthReporter<S>>,
    ) -> impl IntoResponse {
        let status = reporter.check().await;
        let code = if status.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (code, Json(status))
    }

}
