//! Stock Data MCP Server entry point.
//!
//! This binary starts the MCP server using stdio transport for integration
//! with Claude Desktop, Cursor, and other MCP clients.
//!
//! Features:
//! - Health listener on HOST:PORT (with the `http` feature)
//! - Signal handling (SIGTERM, SIGINT)
//! - Graceful shutdown with request draining

use anyhow::Result;
use rmcp::ServiceExt;
use stock_data_mcp_server::shutdown::{
    install_signal_handlers, new_shutdown_controller, SharedShutdownController,
};
#[cfg(feature = "http")]
use stock_data_mcp_server::transport::http_server;
use stock_data_mcp_server::{Config, StockDataMcpServer};
#[cfg(feature = "http")]
use tracing::error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; the log level comes from it
    let config = Config::from_env()?;

    // Initialize logging to stderr (stdout is reserved for JSON-RPC)
    init_logging(config.logging.level.as_filter());

    let version = env!("CARGO_PKG_VERSION");
    eprintln!("Stock Data MCP Server v{version} starting...");
    eprintln!("Transport: stdio");

    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] {}", info);
    }));

    let shutdown_controller = new_shutdown_controller(config.shutdown_drain_timeout);
    install_signal_handlers(shutdown_controller.clone());

    // Connection failures are logged, not fatal; see the health endpoint
    let server = StockDataMcpServer::new(config).await?;
    let store = server.store().clone();
    let metrics = server.metrics().clone();

    spawn_health_listener(&server, &shutdown_controller);

    info!(
        "Serving tool {} and resource {}",
        server.config().tool_name(),
        server.config().resource_uri()
    );
    eprintln!("Server initialized. Ready to accept requests...");

    let transport = rmcp::transport::stdio();
    let service = server.serve(transport).await?;

    let mut shutdown_signal = shutdown_controller.signal();

    tokio::select! {
        quit_reason = service.waiting() => {
            match quit_reason {
                Ok(reason) => eprintln!("Service stopped: {reason:?}"),
                Err(e) => eprintln!("Service error: {e}"),
            }
        }
        _ = shutdown_signal.recv() => {
            eprintln!("Shutdown signal received");
        }
    }

    shutdown_controller
        .graceful_shutdown(&metrics, store.close())
        .await;
    eprintln!("Server shutdown complete");

    Ok(())
}

/// Start the HTTP health listener in the background, if enabled.
#[cfg(feature = "http")]
fn spawn_health_listener(server: &StockDataMcpServer, controller: &SharedShutdownController) {
    if !server.config().http.enabled {
        return;
    }

    let reporter = server.health_reporter();
    let http_config = server.config().http.clone();
    let controller = controller.clone();
    tokio::spawn(async move {
        if let Err(e) = http_server::start_health_server(reporter, &http_config, controller).await {
            error!("Health listener failed: {}", e);
        }
    });
}

#[cfg(not(feature = "http"))]
fn spawn_health_listener(_server: &StockDataMcpServer, _controller: &SharedShutdownController) {}

/// Initialize tracing subscriber with stderr output.
///
/// `RUST_LOG` wins over `LOG_LEVEL`. Logs MUST go to stderr because stdout is
/// used for JSON-RPC communication.
fn init_logging(level: &str) {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,stock_data_mcp_server={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}
