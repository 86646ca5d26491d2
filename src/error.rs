//! Error types for the Stock Data MCP Server.
//!
//! This module defines semantic error types with MongoDB driver error mapping
//! for user-friendly error messages.

use crate::security::sanitize_error_message;
use rmcp::ErrorData;
use thiserror::Error;

/// Domain-specific errors for the Stock Data MCP Server.
///
/// Named `ServerError` to avoid collision with `rmcp`'s protocol error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The document store could not be reached (or did not answer in time).
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Caller-supplied arguments had the wrong shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The store rejected the operation
    #[error("Query execution error: {message}")]
    QueryExecution {
        message: String,
        code: Option<i32>,
    },

    /// Resource not found
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a connection error with a source.
    pub fn connection_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connection {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a query execution error.
    pub fn query_error(msg: impl Into<String>) -> Self {
        Self::QueryExecution {
            message: msg.into(),
            code: None,
        }
    }

    /// Create a query execution error carrying the server's error code.
    pub fn query_error_with_code(msg: impl Into<String>, code: i32) -> Self {
        Self::QueryExecution {
            message: msg.into(),
            code: Some(code),
        }
    }

    /// Create a timeout error. Timeouts surface as connection errors.
    pub fn timeout(operation: &str, timeout: std::time::Duration) -> Self {
        Self::connection(format!(
            "{} timed out after {} ms",
            operation,
            timeout.as_millis()
        ))
    }

    /// Create a resource not found error.
    pub fn resource_not_found(uri: impl Into<String>) -> Self {
        Self::ResourceNotFound(uri.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-readable category used in logs and rendered errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "ConfigError",
            Self::Connection { .. } => "ConnectionError",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::QueryExecution { .. } => "QueryExecutionError",
            Self::ResourceNotFound(_) => "ResourceNotFound",
            Self::Internal(_) => "InternalError",
        }
    }

    /// Check if this error is transient and may succeed if the caller retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Get a user-friendly suggestion for how to fix this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) => Some("Check your environment variables and configuration"),
            Self::Connection { .. } => {
                Some("The database is unreachable right now; retry the request later")
            }
            Self::InvalidArgument(_) => {
                Some("Pass `query` as a JSON object and `options` as a JSON object")
            }
            Self::QueryExecution { .. } => {
                Some("Check the filter operators and field types against the MongoDB query language")
            }
            _ => None,
        }
    }

    /// Caller-facing text: `[Kind] message` with credentials redacted, plus a hint if one exists.
    pub fn render(&self) -> String {
        let mut text = format!("[{}] {}", self.kind(), sanitize_error_message(&self.to_string()));
        if let Some(hint) = self.suggestion() {
            text.push_str("\nHint: ");
            text.push_str(hint);
        }
        text
    }
}

/// Convert ServerError to rmcp's ErrorData for protocol responses.
///
/// Note: Tool errors should generally be rendered as an error tool result
/// instead of using this conversion. This is for protocol-level errors only.
impl From<ServerError> for ErrorData {
    fn from(e: ServerError) -> Self {
        let message = sanitize_error_message(&e.to_string());
        match e {
            ServerError::InvalidArgument(_) => ErrorData::invalid_params(message, None),
            ServerError::ResourceNotFound(_) => ErrorData::resource_not_found(message, None),
            ServerError::Config(_) => ErrorData::invalid_request(message, None),
            ServerError::Connection { .. }
            | ServerError::QueryExecution { .. }
            | ServerError::Internal(_) => ErrorData::internal_error(message, None),
        }
    }
}

impl From<mongodb::error::Error> for ServerError {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        let message = e.to_string();
        match e.kind.as_ref() {
            ErrorKind::ServerSelection { .. } => {
                ServerError::connection(format!("Server selection failed: {}", message))
            }
            ErrorKind::Io(_) => ServerError::connection(format!("IO error: {}", message)),
            ErrorKind::ConnectionPoolCleared { .. } => {
                ServerError::connection(format!("Connection pool cleared: {}", message))
            }
            ErrorKind::DnsResolve { .. } => {
                ServerError::connection(format!("DNS resolution failed: {}", message))
            }
            ErrorKind::Shutdown => ServerError::connection("Client has been shut down"),
            ErrorKind::Authentication { .. } => {
                ServerError::connection(format!("Authentication failed: {}", message))
            }
            ErrorKind::Command(command_error) => {
                ServerError::query_error_with_code(command_error.message.clone(), command_error.code)
            }
            ErrorKind::InvalidArgument { .. } => ServerError::invalid_argument(message),
            ErrorKind::BsonDeserialization(_) | ErrorKind::BsonSerialization(_) => {
                ServerError::query_error(format!("BSON conversion error: {}", message))
            }
            _ => ServerError::query_error(message),
        }
    }
}
