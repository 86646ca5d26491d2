//! The document store seam.
//!
//! Everything above this module talks to a [`DocumentStore`]; the production
//! implementation wraps a MongoDB collection, tests substitute an in-memory one.

use crate::error::ServerError;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection, Database};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// One bounded read against the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FindRequest {
    /// Store-defined predicate, passed through untouched.
    pub filter: Document,
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub skip: u64,
    /// Always positive; callers clamp before building the request.
    pub limit: i64,
}

impl FindRequest {
    /// Match-everything request returning at most `limit` documents.
    pub fn all(limit: i64) -> Self {
        Self {
            filter: Document::new(),
            projection: None,
            sort: None,
            skip: 0,
            limit,
        }
    }
}

/// Read-only access to the configured collection.
///
/// Read-only: there are no write operations.
pub trait DocumentStore: Send + Sync + 'static {
    /// Run a single find and collect the results.
    fn find(
        &self,
        request: FindRequest,
    ) -> impl Future<Output = Result<Vec<Document>, ServerError>> + Send;

    /// Number of documents in the collection.
    fn count_documents(&self) -> impl Future<Output = Result<u64, ServerError>> + Send;

    /// Round-trip to the server to prove it is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), ServerError>> + Send;

    /// Name of the database the collection lives in.
    fn database_name(&self) -> &str;

    /// Name of the collection.
    fn collection_name(&self) -> &str;
}

/// MongoDB-backed store. Cloning is cheap; the driver shares one pool.
#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    database: Database,
    collection: Collection<Document>,
    query_timeout: Duration,
}

impl MongoStore {
    /// Wrap an existing client.
    pub fn new(client: Client, database: &str, collection: &str, query_timeout: Duration) -> Self {
        let database = client.database(database);
        let collection = database.collection::<Document>(collection);
        Self {
            client,
            database,
            collection,
            query_timeout,
        }
    }

    /// Close the client, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.client.clone().shutdown().await;
    }

    /// Apply the per-operation timeout to a store future.
    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T, ServerError>
    where
        F: Future<Output = Result<T, ServerError>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ServerError::timeout(operation, self.query_timeout)),
        }
    }
}

impl DocumentStore for MongoStore {
    async fn find(&self, request: FindRequest) -> Result<Vec<Document>, ServerError> {
        debug!(
            collection = %self.collection.name(),
            limit = request.limit,
            skip = request.skip,
            "Running find"
        );

        let collection = &self.collection;
        self.bounded("find", async move {
            let mut action = collection
                .find(request.filter)
                .skip(request.skip)
                .limit(request.limit);
            if let Some(projection) = request.projection {
                action = action.projection(projection);
            }
            if let Some(sort) = request.sort {
                action = action.sort(sort);
            }

            let cursor = action.await?;
            let documents: Vec<Document> = cursor.try_collect().await?;
            Ok(documents)
        })
        .await
    }

    async fn count_documents(&self) -> Result<u64, ServerError> {
        let collection = &self.collection;
        self.bounded("count", async move {
            Ok(collection.count_documents(doc! {}).await?)
        })
        .await
    }

    async fn ping(&self) -> Result<(), ServerError> {
        let database = &self.database;
        self.bounded("ping", async move {
            database.run_command(doc! { "ping": 1 }).await?;
            Ok(())
        })
        .await
    }

    fn database_name(&self) -> &str {
        self.database.name()
    }

    fn collection_name(&self) -> &str {
        self.collection.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::options::ClientOptions;
    use std::time::Instant;

    /// Store against a non-routable address, so server selection outlasts the query bound.
    async fn stalled_store(query_timeout: Duration) -> MongoStore {
        let mut options = ClientOptions::parse("mongodb://10.255.255.1:27017/")
            .await
            .unwrap();
        options.server_selection_timeout = Some(Duration::from_secs(20));
        let client = Client::with_options(options).unwrap();
        MongoStore::new(client, "stock_data", "detailed_financials", query_timeout)
    }

    #[tokio::test]
    async fn test_find_is_bounded_by_query_timeout() {
        let store = stalled_store(Duration::from_millis(200)).await;

        let started = Instant::now();
        let err = store.find(FindRequest::all(1)).await.unwrap_err();

        assert_eq!(err.kind(), "ConnectionError");
        assert!(err.to_string().contains("timed out"), "{err}");
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_count_and_ping_are_bounded() {
        let store = stalled_store(Duration::from_millis(200)).await;

        let err = store.count_documents().await.unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("timed out"), "{err}");

        let err = store.ping().await.unwrap_err();
        assert_eq!(err.kind(), "ConnectionError");
    }

    #[test]
    fn test_find_all_request() {
        let request = FindRequest::all(10);
        assert!(request.filter.is_empty());
        assert_eq!(request.skip, 0);
        assert_eq!(request.limit, 10);
    }
}
