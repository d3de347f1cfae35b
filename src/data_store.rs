//! # Document Storage Abstraction
//!
//! This module defines the [`DocumentStore`] trait, the boundary between typed resource
//! collections and the database that actually holds their documents. A document store keeps
//! named collections of JSON object bodies and assigns every document its identifier and its
//! `created_at`/`updated_at` timestamps.
//!
//! ## Implementations
//!
//! - [`InMemoryDocumentStore`]: collections kept in a `Mutex<HashMap>`, suitable for development
//!   and tests.
//! - [`PgDocumentStore`](crate::PgDocumentStore): one PostgreSQL table per collection with a
//!   `JSONB` body column.
//!
//! ## Unique indexes
//!
//! Collections can carry unique indexes on top-level body fields. Creating an index is
//! idempotent; writes that would duplicate an indexed value fail with
//! [`DataStoreError::DuplicateKey`].
//!
//! ```rust
//! # use bookshelf::{DocumentStore, InMemoryDocumentStore, DataStoreError};
//! # use serde_json::json;
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = InMemoryDocumentStore::new();
//! store.ensure_unique_index("users", "email").await.unwrap();
//!
//! let body = json!({"name": "Jane", "email": "jane@example.com"});
//! let body = body.as_object().unwrap().clone();
//! let created = store.insert("users", body.clone()).await.unwrap();
//! assert_eq!(created.created_at, created.updated_at);
//!
//! let err = store.insert("users", body).await.unwrap_err();
//! assert_eq!(err, DataStoreError::DuplicateKey { field: "email".to_string() });
//! # });
//! ```

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{DataStoreError, DocumentId};

/// A JSON object body.
pub type Body = Map<String, Value>;

/// A document as held by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Store-assigned identifier.
    pub id: DocumentId,
    /// The document's fields.
    pub body: Body,
    /// When the document was inserted.
    pub created_at: DateTime<Utc>,
    /// When the document was last written.
    pub updated_at: DateTime<Utc>,
}

/// Asynchronous CRUD over named collections of JSON documents.
///
/// Implementors must be safe to share across request handlers; every method takes `&self`.
/// Each method is atomic with respect to the single document it touches. No method spans
/// several documents transactionally.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ensures a unique index on `field` exists for `collection`.
    ///
    /// # Returns
    /// * `Ok(())` - The index exists (whether or not it was created by this call)
    /// * `Err(DataStoreError::DuplicateKey)` - Existing documents already collide on `field`
    async fn ensure_unique_index(&self, collection: &str, field: &str)
    -> Result<(), DataStoreError>;

    /// Returns every document in `collection` in store-native order.
    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, DataStoreError>;

    /// Returns the document with identifier `id`, if any.
    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DataStoreError>;

    /// Inserts a new document, assigning its identifier and timestamps.
    ///
    /// # Returns
    /// * `Ok(StoredDocument)` - The document as persisted
    /// * `Err(DataStoreError::DuplicateKey)` - A unique index rejected the body
    async fn insert(&self, collection: &str, body: Body) -> Result<StoredDocument, DataStoreError>;

    /// Replaces the body of document `id` and refreshes `updated_at`.
    ///
    /// # Returns
    /// * `Ok(Some(StoredDocument))` - The document after replacement
    /// * `Ok(None)` - No document has that identifier
    /// * `Err(DataStoreError::DuplicateKey)` - A unique index rejected the body
    async fn replace(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Body,
    ) -> Result<Option<StoredDocument>, DataStoreError>;

    /// Removes document `id`.
    ///
    /// # Returns
    /// * `Ok(true)` - The document existed and was removed
    /// * `Ok(false)` - No document has that identifier
    async fn remove(&self, collection: &str, id: &DocumentId) -> Result<bool, DataStoreError>;
}

////////////////////////////////////////// InMemoryDocumentStore //////////////////////////////////////

#[derive(Debug, Default)]
struct MemoryCollection {
    documents: Vec<StoredDocument>,
    unique_fields: BTreeSet<String>,
}

impl MemoryCollection {
    /// First unique field on which `body` collides with a document other than `except`.
    fn collision(&self, body: &Body, except: Option<&DocumentId>) -> Option<String> {
        self.unique_fields
            .iter()
            .find(|field| {
                let Some(value) = body.get(field.as_str()).filter(|v| !v.is_null()) else {
                    return false;
                };
                self.documents
                    .iter()
                    .filter(|doc| Some(&doc.id) != except)
                    .any(|doc| doc.body.get(field.as_str()) == Some(value))
            })
            .cloned()
    }
}

/// Thread-safe in-memory implementation of [`DocumentStore`].
///
/// Documents are kept in insertion order, which is the order `find_all` returns them in. Nothing
/// survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: Mutex<HashMap<String, MemoryCollection>>,
}

impl InMemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, MemoryCollection>>, DataStoreError> {
        self.collections
            .lock()
            .map_err(|_| DataStoreError::Internal("in-memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn ensure_unique_index(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<(), DataStoreError> {
        let mut collections = self.lock()?;
        let coll = collections.entry(collection.to_string()).or_default();
        if coll.unique_fields.contains(field) {
            return Ok(());
        }

        let mut seen = Vec::new();
        for doc in &coll.documents {
            if let Some(value) = doc.body.get(field).filter(|v| !v.is_null()) {
                if seen.contains(&value) {
                    return Err(DataStoreError::DuplicateKey {
                        field: field.to_string(),
                    });
                }
                seen.push(value);
            }
        }

        coll.unique_fields.insert(field.to_string());
        Ok(())
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, DataStoreError> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .map(|coll| coll.documents.clone())
            .unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DataStoreError> {
        let collections = self.lock()?;
        Ok(collections
            .get(collection)
            .and_then(|coll| coll.documents.iter().find(|doc| &doc.id == id))
            .cloned())
    }

    async fn insert(&self, collection: &str, body: Body) -> Result<StoredDocument, DataStoreError> {
        let mut collections = self.lock()?;
        let coll = collections.entry(collection.to_string()).or_default();

        if let Some(field) = coll.collision(&body, None) {
            return Err(DataStoreError::DuplicateKey { field });
        }

        let mut id = DocumentId::generate();
        while coll.documents.iter().any(|doc| doc.id == id) {
            id = DocumentId::generate();
        }

        let now = Utc::now();
        let document = StoredDocument {
            id,
            body,
            created_at: now,
            updated_at: now,
        };
        coll.documents.push(document.clone());
        Ok(document)
    }

    async fn replace(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Body,
    ) -> Result<Option<StoredDocument>, DataStoreError> {
        let mut collections = self.lock()?;
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(None);
        };
        if !coll.documents.iter().any(|doc| &doc.id == id) {
            return Ok(None);
        }
        if let Some(field) = coll.collision(&body, Some(id)) {
            return Err(DataStoreError::DuplicateKey { field });
        }

        let Some(document) = coll.documents.iter_mut().find(|doc| &doc.id == id) else {
            return Ok(None);
        };
        document.body = body;
        document.updated_at = Utc::now().max(document.created_at);
        Ok(Some(document.clone()))
    }

    async fn remove(&self, collection: &str, id: &DocumentId) -> Result<bool, DataStoreError> {
        let mut collections = self.lock()?;
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let before = coll.documents.len();
        coll.documents.retain(|doc| &doc.id != id);
        Ok(coll.documents.len() < before)
    }
}
