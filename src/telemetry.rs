//! Request correlation and in-process metrics.
//!
//! This module provides:
//! - Correlation IDs so every log line of one tool call can be grepped together
//! - Atomic counters for queries, resource reads and health checks
//! - A serializable snapshot exposed through the health endpoint

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Generate a short correlation ID (8 characters) for compact logging.
pub fn generate_short_correlation_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Request context for carrying correlation information through the request lifecycle.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request.
    pub correlation_id: String,
    /// When the request was received.
    pub start_time: Instant,
    /// Tool or resource being accessed.
    pub operation: String,
}

impl RequestContext {
    /// Create a new request context with a generated correlation ID.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            correlation_id: generate_short_correlation_id(),
            start_time: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Time since the request was received.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Server metrics collection.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    /// Total number of tool queries handled.
    pub queries_total: AtomicU64,

    /// Queries that returned documents or an empty result.
    pub queries_success: AtomicU64,

    /// Queries rendered as an error block.
    pub queries_failed: AtomicU64,

    /// Total query handling time in milliseconds.
    pub query_time_ms_total: AtomicU64,

    /// Documents returned across all queries and resource reads.
    pub documents_returned: AtomicU64,

    /// Resource reads served.
    pub resource_reads: AtomicU64,

    /// Health checks answered.
    pub health_checks: AtomicU64,

    /// Operations that failed because the store was unreachable.
    pub connection_errors: AtomicU64,

    /// Tool calls and resource reads currently running.
    pub in_flight: AtomicU64,
}

impl ServerMetrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a query execution.
    pub fn record_query(&self, success: bool, duration: Duration) {
        self.queries_total.fetch_add(1, Ordering::Relaxed);
        if success {
            self.queries_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.queries_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.query_time_ms_total
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_documents(&self, count: usize) {
        self.documents_returned
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_resource_read(&self) {
        self.resource_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_health_check(&self) {
        self.health_checks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connection_error(&self) {
        self.connection_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Mark a request as running until the guard is dropped.
    pub fn begin_request(self: &Arc<Self>) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard {
            metrics: Arc::clone(self),
        }
    }

    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_total: self.queries_total.load(Ordering::Relaxed),
            queries_success: self.queries_success.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            query_time_ms_total: self.query_time_ms_total.load(Ordering::Relaxed),
            documents_returned: self.documents_returned.load(Ordering::Relaxed),
            resource_reads: self.resource_reads.load(Ordering::Relaxed),
            health_checks: self.health_checks.load(Ordering::Relaxed),
            connection_errors: self.connection_errors.load(Ordering::Relaxed),
            in_flight: self.in_flight(),
        }
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub queries_total: u64,
    pub queries_success: u64,
    pub queries_failed: u64,
    pub query_time_ms_total: u64,
    pub documents_returned: u64,
    pub resource_reads: u64,
    pub health_checks: u64,
    pub connection_errors: u64,
    pub in_flight: u64,
}

impl MetricsSnapshot {
    /// Calculate average query time in milliseconds.
    pub fn avg_query_time_ms(&self) -> f64 {
        if self.queries_total == 0 {
            return 0.0;
        }
        self.query_time_ms_total as f64 / self.queries_total as f64
    }
}

/// Decrements the in-flight gauge on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    metrics: SharedMetrics,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.metrics.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Shared metrics type for thread-safe access.
pub type SharedMetrics = Arc<ServerMetrics>;

/// Create a new shared metrics collector.
pub fn new_shared_metrics() -> SharedMetrics {
    Arc::new(ServerMetrics::new())
}

/// Query timer for measuring execution duration.
pub struct QueryTimer {
    start: Instant,
    metrics: SharedMetrics,
}

impl QueryTimer {
    /// Start a new query timer.
    pub fn start(metrics: SharedMetrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Stop the timer and record the result.
    pub fn stop(self, success: bool) -> Duration {
        let duration = self.start.elapsed();
        self.metrics.record_query(success, duration);
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correlation_id_length() {
        let id = generate_short_correlation_id();
        assert_eq!(id.len(), 8);
        assert_ne!(id, generate_short_correlation_id());
    }

    #[test]
    fn test_query_timer_records() {
        let metrics = new_shared_metrics();
        QueryTimer::start(metrics.clone()).stop(true);
        QueryTimer::start(metrics.clone()).stop(false);
        metrics.record_documents(7);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.queries_total, 2);
        assert_eq!(snapshot.queries_success, 1);
        assert_eq!(snapshot.queries_failed, 1);
        assert_eq!(snapshot.documents_returned, 7);
    }

    #[test]
    fn test_in_flight_guard() {
        let metrics = new_shared_metrics();
        let first = metrics.begin_request();
        let second = metrics.begin_request();
        assert_eq!(metrics.in_flight(), 2);

        drop(first);
        assert_eq!(metrics.snapshot().in_flight, 1);
        drop(second);
        assert_eq!(metrics.in_flight(), 0);
    }

    #[test]
    fn test_avg_query_time_empty() {
        let snapshot = ServerMetrics::new().snapshot();
        assert_eq!(snapshot.avg_query_time_ms(), 0.0);
    }
}
