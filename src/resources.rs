//! MCP resource for the configured collection.
//!
//! One resource is listed, addressed as `mongodb://<collection>`. Reading it
//! returns the first page of documents with no filter, one content entry per
//! document, rendered the same way as the query tool.

use crate::config::Config;
use crate::constants::{EMPTY_COLLECTION_MESSAGE, RESOURCE_PAGE_SIZE};
use crate::database::{render_document, DocumentStore, FindRequest};
use crate::error::ServerError;
use crate::server::StockDataMcpServer;
use crate::telemetry::RequestContext;
use rmcp::model::{AnnotateAble, RawResource, ReadResourceResult, Resource, ResourceContents};
use tracing::{info, warn};

/// Build the list of available resources.
pub fn build_resource_list(config: &Config) -> Vec<Resource> {
    let collection = &config.database.collection;
    let mut resource = RawResource::new(config.resource_uri(), config.resource_name());
    resource.title = Some(format!("MongoDB {}", collection));
    resource.description = Some(format!("Access to MongoDB collection {}", collection));
    resource.mime_type = Some("application/json".to_string());
    vec![resource.no_annotation()]
}

/// Read a resource by URI.
///
/// Only an unknown URI is an error; store failures become a text entry.
pub async fn read_resource<S: DocumentStore>(
    server: &StockDataMcpServer<S>,
    uri: &str,
) -> Result<ReadResourceResult, ServerError> {
    if uri != server.config().resource_uri() {
        return Err(ServerError::resource_not_found(uri));
    }

    let contents = read_collection_page(server)
        .await
        .into_iter()
        .map(|text| ResourceContents::text(text, uri.to_string()))
        .collect();

    Ok(ReadResourceResult { contents })
}

/// First page of the collection as text blocks. Never fails.
pub async fn read_collection_page<S: DocumentStore>(server: &StockDataMcpServer<S>) -> Vec<String> {
    let _in_flight = server.metrics().begin_request();
    let ctx = RequestContext::new(server.config().resource_uri());
    server.metrics().record_resource_read();

    let result: Result<Vec<String>, ServerError> = async {
        let documents = server.store().find(FindRequest::all(RESOURCE_PAGE_SIZE)).await?;
        documents.into_iter().map(render_document).collect()
    }
    .await;

    match result {
        Ok(blocks) if blocks.is_empty() => {
            info!(correlation_id = %ctx.correlation_id, "Resource read: collection is empty");
            vec![EMPTY_COLLECTION_MESSAGE.to_string()]
        }
        Ok(blocks) => {
            info!(
                correlation_id = %ctx.correlation_id,
                documents = blocks.len(),
                elapsed_ms = ctx.elapsed().as_millis() as u64,
                "Resource read completed"
            );
            server.metrics().record_documents(blocks.len());
            blocks
        }
        Err(e) => {
            if e.is_transient() {
                server.metrics().record_connection_error();
            }
            warn!(
                correlation_id = %ctx.correlation_id,
                kind = e.kind(),
                "Resource read failed"
            );
            vec![format!(
                "Error reading collection {}: {}",
                server.collection_name(),
                e.render()
            )]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::mock::{financial_record, MockFailure, MockStore};
    use rmcp::model::ResourceContents;

    fn server(store: MockStore) -> StockDataMcpServer<MockStore> {
        StockDataMcpServer::with_store(Config::default(), store)
    }

    fn texts(result: ReadResourceResult) -> Vec<String> {
        result
            .contents
            .into_iter()
            .map(|c| match c {
                ResourceContents::TextResourceContents { text, .. } => text,
                other => panic!("unexpected contents: {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_resource_listing() {
        let resources = build_resource_list(&Config::default());
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].raw.name, "mongo_detailed_financials");
        assert_eq!(resources[0].raw.uri, "mongodb://detailed_financials");
        assert_eq!(resources[0].raw.mime_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_read_first_page() {
        let documents = (0..15)
            .map(|i| financial_record("AAPL", "Apple Inc.", 1_000 + i, "2024-06-30"))
            .collect();
        let server = server(MockStore::new(documents));

        let blocks = texts(
            read_resource(&server, "mongodb://detailed_financials")
                .await
                .unwrap(),
        );
        assert_eq!(blocks.len(), 10);

        let request = server.store().last_request().unwrap();
        assert!(request.filter.is_empty());
        assert_eq!(request.limit, 10);
        assert_eq!(server.metrics().snapshot().resource_reads, 1);
    }

    #[tokio::test]
    async fn test_read_empty_collection() {
        let server = server(MockStore::new(Vec::new()));
        let blocks = texts(
            read_resource(&server, "mongodb://detailed_financials")
                .await
                .unwrap(),
        );
        assert_eq!(blocks, vec!["No documents found in the collection.".to_string()]);
    }

    #[tokio::test]
    async fn test_read_unknown_uri() {
        let server = server(MockStore::with_financials());
        let err = read_resource(&server, "mongodb://other_collection")
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::ResourceNotFound(_)));
        assert_eq!(server.store().find_calls(), 0);
    }

    #[tokio::test]
    async fn test_read_with_unreachable_store() {
        let server = server(MockStore::failing(MockFailure::Unreachable));
        let blocks = read_collection_page(&server).await;

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].starts_with("Error reading collection detailed_financials: [ConnectionError]"));
        assert!(!blocks[0].contains("secret"));
    }
}
