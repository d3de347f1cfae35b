mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{Value, json};

use bookshelf::schema::current_year;
use bookshelf::{Body, DataStoreError, DocumentId, DocumentStore, StoredDocument};
use common::ApiTestServer;

#[tokio::test]
async fn create_book_applies_defaults() {
    let test_server = ApiTestServer::new().await;

    let response = test_server
        .server
        .post("/books")
        .json(&json!({"title": "1984", "author": "Orwell"}))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    let book = &body["data"];
    assert_eq!(book["title"], json!("1984"));
    assert_eq!(book["author"], json!("Orwell"));
    assert_eq!(book["year"], json!(current_year()));
    assert_eq!(book["isAvailable"], json!(true));
    assert!(book["id"].is_string());
    assert!(book["createdAt"].is_string());
    assert!(book["updatedAt"].is_string());
}

#[tokio::test]
async fn create_book_trims_title_and_author() {
    let test_server = ApiTestServer::new().await;
    let book = test_server
        .create(
            "/books",
            &json!({"title": "  Dune ", "author": " Herbert", "year": 1965, "isAvailable": false}),
        )
        .await;
    assert_eq!(book["title"], json!("Dune"));
    assert_eq!(book["author"], json!("Herbert"));
    assert_eq!(book["year"], json!(1965));
    assert_eq!(book["isAvailable"], json!(false));
}

#[tokio::test]
async fn create_book_without_author() {
    let test_server = ApiTestServer::new().await;
    let response = test_server
        .server
        .post("/books")
        .json(&json!({"title": "1984"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"success": false, "error": "Title and author are required"}));
}

#[tokio::test]
async fn create_book_with_invalid_year() {
    let test_server = ApiTestServer::new().await;
    let response = test_server
        .server
        .post("/books")
        .json(&json!({"title": "Beowulf", "author": "Unknown", "year": 999}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({
        "success": false,
        "error": "Validation error",
        "message": "Book validation failed: year: Year must be valid"
    }));
}

#[tokio::test]
async fn create_book_with_overlong_fields_lists_every_violation() {
    let test_server = ApiTestServer::new().await;
    let response = test_server
        .server
        .post("/books")
        .json(&json!({"title": "t".repeat(201), "author": "a".repeat(101)}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], json!("Validation error"));
    assert_eq!(
        body["message"],
        json!(
            "Book validation failed: title: Title cannot exceed 200 characters, \
             author: Author name cannot exceed 100 characters"
        )
    );
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let test_server = ApiTestServer::new().await;
    let response = test_server
        .server
        .post("/books")
        .content_type("application/json")
        .bytes("{\"title\": ".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Validation error"));
    assert!(body["message"].is_string());

    let response = test_server
        .server
        .post("/books")
        .json(&json!({"title": "1984", "author": "Orwell", "year": "abc"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], json!("Validation error"));
}

#[tokio::test]
async fn empty_body_fails_required_check() {
    let test_server = ApiTestServer::new().await;
    let response = test_server.server.post("/users").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"success": false, "error": "Name and email are required"}));
}

#[tokio::test]
async fn get_unknown_book() {
    let test_server = ApiTestServer::new().await;
    let response = test_server.server.get("/books/doesnotexist").await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"success": false, "error": "Book not found"}));

    let response = test_server
        .server
        .get("/books/67e55044-10b1-426f-9247-bb680e5fe0c8")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"success": false, "error": "Book not found"}));
}

#[tokio::test]
async fn list_books() {
    let test_server = ApiTestServer::new().await;
    let first = test_server
        .create("/books", &json!({"title": "A", "author": "X"}))
        .await;
    let second = test_server
        .create("/books", &json!({"title": "B", "author": "Y"}))
        .await;

    let response = test_server.server.get("/books").await;
    response.assert_status_ok();
    response.assert_json(&json!({"success": true, "data": [first, second]}));
}

#[tokio::test]
async fn update_book_replaces_fields() {
    let test_server = ApiTestServer::new().await;
    let created = test_server
        .create(
            "/books",
            &json!({"title": "Emma", "author": "Austen", "year": 1815, "isAvailable": false}),
        )
        .await;
    let id = created["id"].as_str().unwrap();

    let response = test_server
        .server
        .put(&format!("/books/{id}"))
        .json(&json!({"title": "Persuasion", "author": "Austen"}))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>()["data"].clone();
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["title"], json!("Persuasion"));
    assert_eq!(updated["year"], json!(current_year()));
    assert_eq!(updated["isAvailable"], json!(true));
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let fetched = test_server.server.get(&format!("/books/{id}")).await;
    fetched.assert_json(&json!({"success": true, "data": updated}));
}

#[tokio::test]
async fn update_unknown_book() {
    let test_server = ApiTestServer::new().await;
    let response = test_server
        .server
        .put("/books/doesnotexist")
        .json(&json!({"title": "T", "author": "A"}))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"success": false, "error": "Book not found"}));
}

#[tokio::test]
async fn failed_update_leaves_book_unchanged() {
    let test_server = ApiTestServer::new().await;
    let created = test_server
        .create("/books", &json!({"title": "Emma", "author": "Austen"}))
        .await;
    let id = created["id"].as_str().unwrap();

    let response = test_server
        .server
        .put(&format!("/books/{id}"))
        .json(&json!({"author": "Austen"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"success": false, "error": "Title and author are required"}));

    let fetched = test_server.server.get(&format!("/books/{id}")).await;
    fetched.assert_json(&json!({"success": true, "data": created}));
}

#[tokio::test]
async fn delete_book_then_get() {
    let test_server = ApiTestServer::new().await;
    let created = test_server
        .create("/books", &json!({"title": "Ulysses", "author": "Joyce"}))
        .await;
    let id = created["id"].as_str().unwrap();

    let response = test_server.server.delete(&format!("/books/{id}")).await;
    response.assert_status(StatusCode::NO_CONTENT);
    assert!(response.text().is_empty());

    let response = test_server.server.get(&format!("/books/{id}")).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = test_server.server.delete(&format!("/books/{id}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"success": false, "error": "Book not found"}));
}

#[tokio::test]
async fn create_user_keeps_optional_fields() {
    let test_server = ApiTestServer::new().await;
    let user = test_server
        .create(
            "/users",
            &json!({
                "name": "John Doe",
                "email": "john@example.com",
                "age": 25,
                "role": "admin",
                "isActive": true
            }),
        )
        .await;
    assert_eq!(user["name"], json!("John Doe"));
    assert_eq!(user["age"], json!(25));
    assert_eq!(user["role"], json!("admin"));
    assert_eq!(user["isActive"], json!(true));
    assert!(user["createdAt"].is_string());
}

#[tokio::test]
async fn duplicate_email() {
    let test_server = ApiTestServer::new().await;
    let user = json!({"name": "Jane", "email": "jane@example.com"});
    test_server.create("/users", &user).await;

    let response = test_server.server.post("/users").json(&user).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"success": false, "error": "Email already exists"}));

    let list = test_server.server.get("/users").await;
    let users: Value = list.json();
    assert_eq!(users["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_user_to_taken_email() {
    let test_server = ApiTestServer::new().await;
    test_server
        .create("/users", &json!({"name": "Jane", "email": "jane@example.com"}))
        .await;
    let john = test_server
        .create("/users", &json!({"name": "John", "email": "john@example.com"}))
        .await;
    let id = john["id"].as_str().unwrap();

    let response = test_server
        .server
        .put(&format!("/users/{id}"))
        .json(&json!({"name": "John", "email": "jane@example.com"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({"success": false, "error": "Email already exists"}));
}

#[tokio::test]
async fn user_routes_report_user_not_found() {
    let test_server = ApiTestServer::new().await;
    let response = test_server.server.delete("/users/doesnotexist").await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"success": false, "error": "User not found"}));
}

/// Accepts index creation, then fails every read and write.
struct UnreachableStore;

fn unreachable() -> DataStoreError {
    DataStoreError::Internal("connection refused".to_string())
}

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn ensure_unique_index(&self, _: &str, _: &str) -> Result<(), DataStoreError> {
        Ok(())
    }

    async fn find_all(&self, _: &str) -> Result<Vec<StoredDocument>, DataStoreError> {
        Err(unreachable())
    }

    async fn find_by_id(
        &self,
        _: &str,
        _: &DocumentId,
    ) -> Result<Option<StoredDocument>, DataStoreError> {
        Err(unreachable())
    }

    async fn insert(&self, _: &str, _: Body) -> Result<StoredDocument, DataStoreError> {
        Err(unreachable())
    }

    async fn replace(
        &self,
        _: &str,
        _: &DocumentId,
        _: Body,
    ) -> Result<Option<StoredDocument>, DataStoreError> {
        Err(unreachable())
    }

    async fn remove(&self, _: &str, _: &DocumentId) -> Result<bool, DataStoreError> {
        Err(unreachable())
    }
}

#[tokio::test]
async fn store_faults_are_internal_errors() {
    let test_server = ApiTestServer::with_store(Arc::new(UnreachableStore)).await;
    let id = DocumentId::generate().to_string();

    let response = test_server.server.get("/books").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "success": false,
        "error": "Error fetching books",
        "message": "internal error: connection refused"
    }));

    let response = test_server
        .server
        .post("/users")
        .json(&json!({"name": "Ada", "email": "ada@example.com"}))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"], json!("Error creating user"));

    let response = test_server.server.delete(&format!("/books/{id}")).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>()["error"], json!("Error deleting book"));
}

#[tokio::test]
async fn trailing_slash_and_unknown_routes() {
    let test_server = ApiTestServer::new().await;
    test_server
        .create("/books/", &json!({"title": "Dune", "author": "Herbert"}))
        .await;

    let response = test_server.server.get("/books/").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"].as_array().unwrap().len(), 1);

    let response = test_server.server.get("/books/shelves/1").await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({"success": false, "error": "Route not found"}));
}
