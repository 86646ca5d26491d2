//! Graceful shutdown handling with request draining.
//!
//! This module provides:
//! - Signal handling (SIGTERM, SIGINT, Ctrl+C)
//! - Draining of in-flight tool calls with a configurable timeout
//! - Closing the store handle once draining has finished

use crate::constants::DEFAULT_DRAIN_TIMEOUT;
use crate::telemetry::SharedMetrics;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};

/// Interval between in-flight checks while draining.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shutdown signal that can be awaited.
#[derive(Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Wait for the shutdown signal.
    pub async fn recv(&mut self) {
        let _ = self.receiver.wait_for(|&v| v).await;
    }

    /// Check if shutdown has been signaled without blocking.
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Shutdown phases, broadcast to subscribers as they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownPhase {
    Initiated,
    DrainingRequests,
    ClosingConnections,
    Complete,
}

impl std::fmt::Display for ShutdownPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownPhase::Initiated => write!(f, "initiated"),
            ShutdownPhase::DrainingRequests => write!(f, "draining_requests"),
            ShutdownPhase::ClosingConnections => write!(f, "closing_connections"),
            ShutdownPhase::Complete => write!(f, "complete"),
        }
    }
}

/// Controller for managing graceful shutdown.
pub struct ShutdownController {
    sender: watch::Sender<bool>,
    shutting_down: AtomicBool,
    phase_sender: broadcast::Sender<ShutdownPhase>,
    drain_timeout: Duration,
}

impl ShutdownController {
    /// Create a new shutdown controller with the default drain timeout.
    pub fn new() -> Self {
        Self::with_drain_timeout(DEFAULT_DRAIN_TIMEOUT)
    }

    pub fn with_drain_timeout(drain_timeout: Duration) -> Self {
        let (sender, _) = watch::channel(false);
        let (phase_sender, _) = broadcast::channel(8);

        Self {
            sender,
            shutting_down: AtomicBool::new(false),
            phase_sender,
            drain_timeout,
        }
    }

    /// Get a shutdown signal receiver.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe to shutdown phase notifications.
    pub fn subscribe_phases(&self) -> broadcast::Receiver<ShutdownPhase> {
        self.phase_sender.subscribe()
    }

    /// Check if shutdown is in progress.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// Initiate shutdown. Idempotent.
    pub fn shutdown(&self) {
        if self
            .shutting_down
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            info!("Initiating graceful shutdown...");
            let _ = self.sender.send(true);
            let _ = self.phase_sender.send(ShutdownPhase::Initiated);
        }
    }

    fn notify_phase(&self, phase: ShutdownPhase) {
        info!("Shutdown phase: {}", phase);
        let _ = self.phase_sender.send(phase);
    }

    /// Perform graceful shutdown.
    ///
    /// Waits for in-flight requests (up to the drain timeout), then runs
    /// `close` to release the store.
    pub async fn graceful_shutdown<F>(&self, metrics: &SharedMetrics, close: F)
    where
        F: Future<Output = ()>,
    {
        self.shutdown();

        self.notify_phase(ShutdownPhase::DrainingRequests);
        self.drain_requests(metrics).await;

        self.notify_phase(ShutdownPhase::ClosingConnections);
        close.await;

        self.notify_phase(ShutdownPhase::Complete);
        info!("Graceful shutdown complete");
    }

    async fn drain_requests(&self, metrics: &SharedMetrics) {
        let start = Instant::now();

        loop {
            let running = metrics.in_flight();
            if running == 0 {
                info!("All requests drained");
                return;
            }

            if start.elapsed() > self.drain_timeout {
                warn!(
                    "Drain timeout exceeded with {} requests still running",
                    running
                );
                return;
            }

            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    }

    pub fn drain_timeout(&self) -> Duration {
        self.drain_timeout
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared shutdown controller type.
pub type SharedShutdownController = Arc<ShutdownController>;

/// Create a shared shutdown controller.
pub fn new_shutdown_controller(drain_timeout: Duration) -> SharedShutdownController {
    Arc::new(ShutdownController::with_drain_timeout(drain_timeout))
}

/// Install signal handlers for graceful shutdown.
///
/// SIGINT (Ctrl+C) everywhere, SIGTERM on Unix. Either one triggers the
/// controller.
pub fn install_signal_handlers(controller: SharedShutdownController) {
    let ctrl_c_controller = controller.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating shutdown...");
                ctrl_c_controller.shutdown();
            }
            Err(e) => {
                error!("Failed to listen for Ctrl+C signal: {}", e);
            }
        }
    });

    #[cfg(unix)]
    tokio::spawn(async move {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, initiating shutdown...");
                controller.shutdown();
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    });

    #[cfg(not(unix))]
    drop(controller);
}
