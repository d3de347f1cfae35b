use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;

use bookshelf::{DocumentStore, InMemoryDocumentStore, create_router};

/// Test server over a fresh in-memory store.
pub struct ApiTestServer {
    pub server: TestServer,
}

impl ApiTestServer {
    pub async fn new() -> Self {
        Self::with_store(Arc::new(InMemoryDocumentStore::new())).await
    }

    /// Test server over an arbitrary store.
    pub async fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let app = create_router(store).await.unwrap();
        let server = TestServer::new(app).unwrap();
        Self { server }
    }

    /// POSTs `body` to `path`, asserts 201 and returns the created document.
    #[allow(dead_code)]
    pub async fn create(&self, path: &str, body: &Value) -> Value {
        let response = self.server.post(path).json(body).await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }
}
