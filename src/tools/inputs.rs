//! Tool input types with JSON Schema generation, and argument parsing.
//!
//! The schema types only describe the tool to clients. Arguments are parsed
//! by hand from the raw JSON object so that a wrongly shaped `query` becomes a
//! rendered `InvalidArgument` result instead of a protocol error.

use crate::constants::{DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT, MIN_QUERY_LIMIT};
use crate::database::FindRequest;
use crate::error::ServerError;
use mongodb::bson::Document;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw tool arguments as received from the client.
pub type JsonObject = Map<String, Value>;

/// Input schema for the collection query tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryToolInput {
    /// MongoDB query filter.
    #[schemars(description = "MongoDB query filter, e.g. {\"symbol\": \"AAPL\"}. Extended JSON such as {\"$oid\": \"...\"} is accepted.")]
    pub query: Map<String, Value>,

    /// Query options.
    #[serde(default)]
    #[schemars(description = "MongoDB query options (projection, sort, limit, skip)")]
    pub options: Option<QueryOptionsInput>,
}

/// Schema for the recognized option keys. Unrecognized keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct QueryOptionsInput {
    /// Fields to include/exclude.
    #[serde(default)]
    #[schemars(description = "Fields to include (1) or exclude (0)")]
    pub projection: Option<Map<String, Value>>,

    /// Sort criteria.
    #[serde(default)]
    #[schemars(description = "Sort criteria, field -> 1 (ascending) or -1 (descending)")]
    pub sort: Option<Map<String, Value>>,

    /// Maximum number of documents to return.
    #[serde(default)]
    #[schemars(
        description = "Maximum number of documents to return (1-100, default 100)",
        range(min = 1, max = 100)
    )]
    pub limit: Option<i64>,

    /// Number of documents to skip.
    #[serde(default)]
    #[schemars(description = "Number of documents to skip (default 0)", range(min = 0))]
    pub skip: Option<i64>,
}

/// Validated options, ready to hand to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    /// Clamped into `[MIN_QUERY_LIMIT, MAX_QUERY_LIMIT]`.
    pub limit: i64,
    pub skip: u64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            projection: None,
            sort: None,
            limit: DEFAULT_QUERY_LIMIT,
            skip: 0,
        }
    }
}

impl QueryOptions {
    /// Parse the `options` object. Only the container shapes are validated;
    /// out-of-range numbers are coerced.
    pub fn from_json(options: &JsonObject) -> Result<Self, ServerError> {
        Ok(Self {
            projection: optional_document("options.projection", options.get("projection"))?,
            sort: optional_document("options.sort", options.get("sort"))?,
            limit: clamp_limit(options.get("limit")),
            skip: coerce_skip(options.get("skip")),
        })
    }
}

/// A validated call of the query tool.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryArguments {
    pub filter: Document,
    pub options: QueryOptions,
}

impl QueryArguments {
    /// Validate raw tool arguments.
    ///
    /// `query` is required and must be an object; `options` may be absent or
    /// null but otherwise must be an object too.
    pub fn parse(arguments: Option<&JsonObject>) -> Result<Self, ServerError> {
        let arguments = arguments.ok_or_else(|| {
            ServerError::invalid_argument("missing arguments; expected {\"query\": {...}}")
        })?;

        let filter = match arguments.get("query") {
            Some(Value::Object(map)) => to_document("query", map)?,
            Some(other) => {
                return Err(ServerError::invalid_argument(format!(
                    "`query` must be an object, got {}",
                    json_type(other)
                )))
            }
            None => return Err(ServerError::invalid_argument("`query` is required")),
        };

        let options = match arguments.get("options") {
            None | Some(Value::Null) => QueryOptions::default(),
            Some(Value::Object(map)) => QueryOptions::from_json(map)?,
            Some(other) => {
                return Err(ServerError::invalid_argument(format!(
                    "`options` must be an object, got {}",
                    json_type(other)
                )))
            }
        };

        Ok(Self { filter, options })
    }

    /// The single read this call turns into.
    pub fn into_find_request(self) -> FindRequest {
        FindRequest {
            filter: self.filter,
            projection: self.options.projection,
            sort: self.options.sort,
            skip: self.options.skip,
            limit: self.options.limit,
        }
    }
}

/// Clamp a requested limit into the allowed range.
///
/// Absent, null or non-integer values fall back to the default.
pub fn clamp_limit(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(limit) => limit.clamp(MIN_QUERY_LIMIT, MAX_QUERY_LIMIT),
            // Integers beyond i64::MAX
            None if n.is_u64() => MAX_QUERY_LIMIT,
            None => DEFAULT_QUERY_LIMIT,
        },
        _ => DEFAULT_QUERY_LIMIT,
    }
}

/// Negative or non-integer skips become 0.
fn coerce_skip(value: Option<&Value>) -> u64 {
    value.and_then(Value::as_u64).unwrap_or(0)
}

fn optional_document(field: &str, value: Option<&Value>) -> Result<Option<Document>, ServerError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(Value::Object(map)) => to_document(field, map).map(Some),
        Some(other) => Err(ServerError::invalid_argument(format!(
            "`{}` must be an object, got {}",
            field,
            json_type(other)
        ))),
    }
}

/// Convert an Extended JSON object into a BSON document.
fn to_document(field: &str, map: &JsonObject) -> Result<Document, ServerError> {
    Document::try_from(map.clone()).map_err(|e| {
        ServerError::invalid_argument(format!("`{}` is not valid Extended JSON: {}", field, e))
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
