//! MCP tool for the configured collection.
//!
//! Exactly one tool is exposed, named `query_<collection>`. It runs a single
//! bounded find and answers with one text block per matched document:
//!
//! - Filters are passed to the store untouched (Extended JSON accepted)
//! - `options.limit` is clamped into 1..=100, default 100
//! - Failures are rendered into the result, never raised to the protocol layer

mod inputs;

pub use inputs::*;

use crate::config::Config;
use crate::constants::NO_MATCHES_MESSAGE;
use crate::database::{render_document, DocumentStore};
use crate::error::ServerError;
use crate::server::StockDataMcpServer;
use crate::telemetry::{QueryTimer, RequestContext};
use rmcp::model::{CallToolResult, Content, Tool};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one tool call, before it is wrapped into a protocol result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    /// Text blocks in order.
    pub blocks: Vec<String>,
    pub is_error: bool,
}

impl ToolResponse {
    /// One block per rendered document.
    pub fn documents(blocks: Vec<String>) -> Self {
        if blocks.is_empty() {
            return Self::empty();
        }
        Self {
            blocks,
            is_error: false,
        }
    }

    /// The no-match answer. Not an error.
    pub fn empty() -> Self {
        Self {
            blocks: vec![NO_MATCHES_MESSAGE.to_string()],
            is_error: false,
        }
    }

    /// A single rendered error block.
    pub fn error(collection: &str, error: &ServerError) -> Self {
        Self {
            blocks: vec![format!(
                "Error executing query on {}: {}",
                collection,
                error.render()
            )],
            is_error: true,
        }
    }

    pub fn into_call_result(self) -> CallToolResult {
        let content = self.blocks.into_iter().map(Content::text).collect();
        if self.is_error {
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

/// Descriptor advertised by `tools/list`.
pub fn query_tool_definition(config: &Config) -> Tool {
    let collection = &config.database.collection;
    let description = format!(
        "Query the MongoDB collection '{collection}' in database '{db}'. \
         Pass `query` as a MongoDB filter object (e.g. {{\"symbol\": \"AAPL\"}}) and optional \
         `options` with `projection`, `sort`, `limit` (1-100, default 100) and `skip`. \
         Returns one JSON document per result.",
        db = config.database.database,
    );

    Tool::new(config.tool_name(), description, Arc::new(query_input_schema()))
}

/// JSON Schema of the tool input as an object.
pub fn query_input_schema() -> JsonObject {
    match serde_json::to_value(schemars::schema_for!(QueryToolInput)) {
        Ok(Value::Object(map)) => map,
        _ => {
            let mut map = JsonObject::new();
            map.insert("type".to_string(), Value::String("object".to_string()));
            map
        }
    }
}

impl<S: DocumentStore> StockDataMcpServer<S> {
    /// Run the collection query tool.
    ///
    /// Always produces a response; errors are rendered into a single block.
    pub async fn query_collection(&self, arguments: Option<&JsonObject>) -> ToolResponse {
        let _in_flight = self.metrics.begin_request();
        let ctx = RequestContext::new(self.config.tool_name());
        let collection = self.collection_name();
        info!(
            correlation_id = %ctx.correlation_id,
            tool = %ctx.operation,
            "Tool call received"
        );

        let timer = QueryTimer::start(self.metrics.clone());
        let result = self.execute_query(arguments).await;
        let elapsed = timer.stop(result.is_ok());

        match result {
            Ok(blocks) => {
                info!(
                    correlation_id = %ctx.correlation_id,
                    documents = blocks.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Tool call completed"
                );
                self.metrics.record_documents(blocks.len());
                ToolResponse::documents(blocks)
            }
            Err(e) => {
                if e.is_transient() {
                    self.metrics.record_connection_error();
                }
                // Argument and query errors echo filter values; keep them out of logs
                if e.is_transient() {
                    warn!(
                        correlation_id = %ctx.correlation_id,
                        tool = %ctx.operation,
                        kind = e.kind(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Tool call failed: {}",
                        crate::security::sanitize_error_message(&e.to_string())
                    );
                } else {
                    warn!(
                        correlation_id = %ctx.correlation_id,
                        tool = %ctx.operation,
                        kind = e.kind(),
                        elapsed_ms = elapsed.as_millis() as u64,
                        "Tool call failed"
                    );
                }
                ToolResponse::error(collection, &e)
            }
        }
    }

    /// Validate arguments, run the find, render each document.
    async fn execute_query(
        &self,
        arguments: Option<&JsonObject>,
    ) -> Result<Vec<String>, ServerError> {
        let request = QueryArguments::parse(arguments)?.into_find_request();
        debug!(
            limit = request.limit,
            skip = request.skip,
            has_projection = request.projection.is_some(),
            has_sort = request.sort.is_some(),
            "Query arguments validated"
        );

        let documents = self.store.find(request).await?;
        documents.into_iter().map(render_document).collect()
    }
}
