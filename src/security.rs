//! Security helpers: namespace validation and credential redaction.

mod identifiers;
mod redaction;

pub use identifiers::{validate_collection_name, validate_database_name, MAX_NAMESPACE_LENGTH};
pub use redaction::{redact_uri, sanitize_error_message};
