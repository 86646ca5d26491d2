//! MongoDB namespace validation.
//!
//! Database and collection names come from the environment, so they are
//! checked once at startup against the server's naming restrictions.

use crate::error::ServerError;

/// Maximum length of a `database.collection` namespace.
pub const MAX_NAMESPACE_LENGTH: usize = 255;

/// Characters MongoDB forbids in database names.
const FORBIDDEN_DATABASE_CHARS: &[char] = &['/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?', '\0'];

/// Validate a database name.
///
/// # Examples
///
/// ```
/// use stock_data_mcp_server::security::validate_database_name;
///
/// assert!(validate_database_name("stock_data").is_ok());
/// assert!(validate_database_name("stock.data").is_err());
/// assert!(validate_database_name("").is_err());
/// ```
pub fn validate_database_name(name: &str) -> Result<(), ServerError> {
    if name.is_empty() {
        return Err(ServerError::config("Database name cannot be empty"));
    }

    if name.len() >= 64 {
        return Err(ServerError::config(format!(
            "Database name '{}' must be shorter than 64 bytes",
            name
        )));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_DATABASE_CHARS.contains(c)) {
        return Err(ServerError::config(format!(
            "Database name '{}' contains forbidden character {:?}",
            name, c
        )));
    }

    Ok(())
}

/// Validate a collection name in the context of its database.
pub fn validate_collection_name(database: &str, name: &str) -> Result<(), ServerError> {
    if name.is_empty() {
        return Err(ServerError::config("Collection name cannot be empty"));
    }

    if name.contains('$') {
        return Err(ServerError::config(format!(
            "Collection name '{}' cannot contain '$'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(ServerError::config("Collection name cannot contain a null byte"));
    }

    if name.starts_with("system.") {
        return Err(ServerError::config(format!(
            "Collection name '{}' is reserved for internal use",
            name
        )));
    }

    // Namespace is "<db>.<collection>"
    if database.len() + 1 + name.len() > MAX_NAMESPACE_LENGTH {
        return Err(ServerError::config(format!(
            "Namespace '{}.{}' exceeds {} bytes",
            database, name, MAX_NAMESPACE_LENGTH
        )));
    }

    Ok(())
}
