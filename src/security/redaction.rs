//! Credential redaction for logs and caller-facing error text.
//!
//! Driver errors echo connection strings and hostnames; anything that leaves
//! the process goes through these helpers first.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the userinfo part of a MongoDB URI (`mongodb://user:pass@`).
static URI_CREDENTIALS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(mongodb(?:\+srv)?://)[^@/\s]+@")
        .unwrap_or_else(|e| panic!("Internal error: invalid credentials pattern: {}", e))
});

/// Matches `password=...` style fragments in option strings.
static PASSWORD_OPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|pwd|secret)=[^&\s,;]+")
        .unwrap_or_else(|e| panic!("Internal error: invalid password pattern: {}", e))
});

/// Redact the credentials of a connection string, keeping hosts and options.
///
/// # Examples
///
/// ```
/// use stock_data_mcp_server::security::redact_uri;
///
/// assert_eq!(
///     redact_uri("mongodb://admin:secret@db:27017/"),
///     "mongodb://***@db:27017/"
/// );
/// assert_eq!(redact_uri("mongodb://localhost:27017/"), "mongodb://localhost:27017/");
/// ```
pub fn redact_uri(uri: &str) -> String {
    URI_CREDENTIALS.replace_all(uri, "${1}***@").into_owned()
}

/// Strip credentials from an error message before it is shown to a caller.
pub fn sanitize_error_message(message: &str) -> String {
    let redacted = URI_CREDENTIALS.replace_all(message, "${1}***@");
    PASSWORD_OPTION
        .replace_all(&redacted, "${1}=***")
        .into_owned()
}
