//! ServerHandler implementation for the Stock Data MCP Server.
//!
//! This module implements the rmcp `ServerHandler` trait which defines how
//! the server responds to MCP protocol requests. Routing is written out by
//! hand because the tool name depends on the configured collection.

use crate::database::DocumentStore;
use crate::resources::{build_resource_list, read_resource};
use crate::server::StockDataMcpServer;
use crate::tools::query_tool_definition;
use rmcp::handler::server::ServerHandler;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Implementation, ListResourcesResult, ListToolsResult,
    PaginatedRequestParam, ProtocolVersion, ReadResourceRequestParam, ReadResourceResult,
    ServerCapabilities, ServerInfo,
};
use rmcp::service::{RequestContext, RoleServer};
use rmcp::ErrorData;
use tracing::{debug, info, warn};

impl<S: DocumentStore> ServerHandler for StockDataMcpServer<S> {
    /// Server identification - called during initialization handshake.
    fn get_info(&self) -> ServerInfo {
        info!("MCP client requesting server info");

        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,

            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),

            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                title: Some("Stock Data MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },

            instructions: Some(build_instructions(self)),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        debug!("Listing tools");
        Ok(ListToolsResult {
            tools: vec![query_tool_definition(self.config())],
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.dispatch_tool_call(request).await
    }

    /// List available resources.
    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, ErrorData> {
        debug!("Listing resources");
        Ok(ListResourcesResult {
            resources: build_resource_list(self.config()),
            next_cursor: None,
        })
    }

    /// Read a specific resource.
    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, ErrorData> {
        read_resource(self, &request.uri).await.map_err(Into::into)
    }
}

impl<S: DocumentStore> StockDataMcpServer<S> {
    /// Route a tool call by name. Only the collection query tool exists.
    pub(crate) async fn dispatch_tool_call(
        &self,
        request: CallToolRequestParam,
    ) -> Result<CallToolResult, ErrorData> {
        if request.name != self.config().tool_name() {
            warn!("Unknown tool requested: {}", request.name);
            return Err(ErrorData::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ));
        }

        Ok(self
            .query_collection(request.arguments.as_ref())
            .await
            .into_call_result())
    }
}

/// Build server instructions for the connected collection.
fn build_instructions<S: DocumentStore>(server: &StockDataMcpServer<S>) -> String {
    let config = server.config();
    let mut instructions = String::new();

    instructions.push_str("# Stock Data MCP Server\n\n");
    instructions.push_str(&format!(
        "Read-only access to the MongoDB collection `{}` in database `{}`, \
         holding company financial records (symbol, company name, financial metrics, date).\n\n",
        config.database.collection, config.database.database
    ));

    instructions.push_str("### Resources\n");
    instructions.push_str(&format!(
        "- `{}`: the first {} documents, unfiltered\n\n",
        config.resource_uri(),
        crate::constants::RESOURCE_PAGE_SIZE
    ));

    instructions.push_str("### Tools\n");
    instructions.push_str(&format!(
        "- `{}`: MongoDB filter in `query`, optional `options` (projection, sort, limit, skip)\n",
        config.tool_name()
    ));
    instructions.push_str("- At most 100 documents are returned per call\n");
    instructions.push_str("- Use `skip` with `sort` to page through larger result sets\n");

    instructions
}
