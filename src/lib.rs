//! # Bookshelf: CRUD over Books and Users
//!
//! Bookshelf is a small REST service that stores two kinds of documents, **books** and
//! **users**, and exposes the same create/read/update/delete contract for both. The crate
//! provides:
//!
//! - **Resource Schemas**: typed documents ([`Book`], [`User`]) with required-field checks,
//!   defaults and declarative field constraints
//! - **Typed Collections**: a store adapter ([`Collection`]) that turns every storage outcome
//!   into one of four [`StoreError`] variants
//! - **Pluggable Storage**: an async [`DocumentStore`] trait with an in-memory implementation
//!   and a PostgreSQL implementation backed by `JSONB` columns
//! - **HTTP API**: Axum routes answering with a `{success, data | error, message}` envelope
//! - **Command-Line Tools**: the `bookshelfd` daemon, the `shelfctl` client and migration tools
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Router (Axum routes, request logging)   │
//! ├─────────────────────────────────────────┤
//! │ Controller (status codes, envelopes)    │
//! ├─────────────────────────────────────────┤
//! │ Collection<R> (validation, outcomes)    │
//! ├─────────────────────────────────────────┤
//! │ DocumentStore (memory or PostgreSQL)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path                | Success                  |
//! |--------|---------------------|--------------------------|
//! | GET    | `/`                 | 200, plain-text health   |
//! | GET    | `/books`, `/users`  | 200 with a list          |
//! | POST   | `/books`, `/users`  | 201 with the new document|
//! | GET    | `/{collection}/:id` | 200 with the document    |
//! | PUT    | `/{collection}/:id` | 200 with the replacement |
//! | DELETE | `/{collection}/:id` | 204, empty               |
//!
//! ## Usage Examples
//!
//! ### Working with a Collection
//!
//! ```rust
//! # use std::sync::Arc;
//! # use bookshelf::{Book, BookFields, Collection, InMemoryDocumentStore, StoreError};
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(InMemoryDocumentStore::new());
//! let books = Collection::<Book>::open(store).await.unwrap();
//!
//! let created = books.create(BookFields::new("1984", "Orwell")).await.unwrap();
//! assert!(created.fields.is_available);
//!
//! let id = created.id.to_string();
//! assert_eq!(books.get(&id).await.unwrap(), created);
//!
//! books.delete(&id).await.unwrap();
//! assert_eq!(books.get(&id).await.unwrap_err(), StoreError::NotFound);
//! # });
//! ```
//!
//! ### Serving the API
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use bookshelf::{InMemoryDocumentStore, create_router};
//! # async fn serve() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_router(Arc::new(InMemoryDocumentStore::new())).await?;
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

mod book;
mod collection;
mod data_store;
mod document_id;
mod errors;
mod logging;
mod router;
mod user;

// CLI utility modules

/// Command-line interface utilities for program termination and output formatting.
pub mod cli_utils;

/// Command-line interface command handlers for shelfctl.
pub mod commands;

/// Daemon configuration from flags, environment and defaults.
pub mod config;

/// HTTP handlers and the response envelope.
pub mod controller;

/// HTTP client for bookshelf servers.
pub mod http_utils;

/// Resource schemas and validation.
pub mod schema;

/// PostgreSQL storage.
pub mod sql;

pub use book::{Book, BookFields};
pub use collection::{Collection, Document};
pub use config::{ConfigError, ConfigOverrides, ServerConfig};
pub use controller::{ApiError, Envelope, Operation};
pub use data_store::{Body, DocumentStore, InMemoryDocumentStore, StoredDocument};
pub use document_id::{DocumentId, DocumentIdParseError};
pub use errors::{DataStoreError, StoreError};
pub use logging::init_tracing;
pub use router::{HEALTH_MESSAGE, create_resource_router, create_router};
pub use schema::{Resource, ValidationError};
pub use sql::PgDocumentStore;
pub use user::{User, UserFields};
