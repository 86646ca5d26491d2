//! Centralized constants for the Stock Data MCP Server.
//!
//! This module contains all magic numbers and default values used throughout
//! the codebase, making them easy to find, understand, and modify.

use std::time::Duration;

// =============================================================================
// Connection Defaults
// =============================================================================

/// Default MongoDB connection string.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";

/// Default database name.
pub const DEFAULT_DB_NAME: &str = "stock_data";

/// Default collection name.
pub const DEFAULT_COLLECTION_NAME: &str = "detailed_financials";

/// Application name reported to the MongoDB server.
pub const APP_NAME: &str = "stock-data-mcp-server";

// =============================================================================
// Timeout Constants
// =============================================================================

/// Default server selection timeout in seconds.
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 5;

/// Default per-operation timeout in seconds.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Default server selection timeout as Duration.
pub const DEFAULT_SERVER_SELECTION_TIMEOUT: Duration =
    Duration::from_secs(DEFAULT_SERVER_SELECTION_TIMEOUT_SECS);

/// Default per-operation timeout as Duration.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS);

// =============================================================================
// Result Size Constants
// =============================================================================

/// Smallest number of documents a query may return.
pub const MIN_QUERY_LIMIT: i64 = 1;

/// Largest number of documents a query may return.
pub const MAX_QUERY_LIMIT: i64 = 100;

/// Limit applied when the caller gives none (or an unusable one).
pub const DEFAULT_QUERY_LIMIT: i64 = MAX_QUERY_LIMIT;

/// Number of documents returned when reading the collection resource.
pub const RESOURCE_PAGE_SIZE: i64 = 10;

// =============================================================================
// Response Text
// =============================================================================

/// Tool response when a query matches nothing.
pub const NO_MATCHES_MESSAGE: &str = "No matching documents found.";

/// Resource response when the collection is empty.
pub const EMPTY_COLLECTION_MESSAGE: &str = "No documents found in the collection.";

// =============================================================================
// HTTP Constants
// =============================================================================

/// Default health listener host.
pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";

/// Default health listener port.
pub const DEFAULT_HTTP_PORT: u16 = 8000;

// =============================================================================
// Shutdown Constants
// =============================================================================

/// Default shutdown drain timeout in seconds.
pub const DEFAULT_DRAIN_TIMEOUT_SECS: u64 = 10;

/// Default shutdown drain timeout as Duration.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(DEFAULT_DRAIN_TIMEOUT_SECS);

// =============================================================================
// Logging Constants
// =============================================================================

/// Default log level when neither `LOG_LEVEL` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_durations() {
        assert_eq!(DEFAULT_SERVER_SELECTION_TIMEOUT, Duration::from_secs(5));
        assert_eq!(DEFAULT_QUERY_TIMEOUT, Duration::from_secs(30));
        assert_eq!(DEFAULT_DRAIN_TIMEOUT, Duration::from_secs(10));
    }

    #[test]
    fn test_limit_bounds() {
        assert!(MIN_QUERY_LIMIT <= DEFAULT_QUERY_LIMIT);
        assert!(DEFAULT_QUERY_LIMIT <= MAX_QUERY_LIMIT);
        assert!(RESOURCE_PAGE_SIZE <= MAX_QUERY_LIMIT);
    }
}
