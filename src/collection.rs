//! # Typed Resource Collections
//!
//! [`Collection`] is the store adapter between the HTTP controller and a [`DocumentStore`]. It
//! owns the typed view of one collection: request fields go in, validated [`Resource`] values are
//! encoded into JSON bodies, and stored documents come back out as [`Document`]s.
//!
//! Every failure is reported as one of the four [`StoreError`] outcomes:
//!
//! ```text
//! Controller ──fields──▶ Collection<R> ──Body──▶ DocumentStore
//!            ◀─StoreError─              ◀─DataStoreError─
//! ```
//!
//! ## Identifiers
//!
//! Path identifiers arrive as text. Text that does not parse as a [`DocumentId`] cannot name an
//! existing document, so it is reported as [`StoreError::NotFound`].

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data_store::{Body, DocumentStore, StoredDocument};
use crate::schema::{Resource, prepare};
use crate::{DocumentId, StoreError};

/// A persisted resource: its fields plus the store-assigned identifier and timestamps.
///
/// Serializes flat, e.g. `{"id": "...", "title": "...", "createdAt": "...", "updatedAt": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "R: Resource"))]
pub struct Document<R> {
    pub id: DocumentId,
    #[serde(flatten)]
    pub fields: R,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<R: Resource> TryFrom<StoredDocument> for Document<R> {
    type Error = StoreError;

    fn try_from(stored: StoredDocument) -> Result<Self, Self::Error> {
        let fields = serde_json::from_value::<R>(Value::Object(stored.body)).map_err(|e| {
            tracing::error!(
                collection = R::COLLECTION,
                id = %stored.id,
                error = %e,
                "stored document does not decode"
            );
            StoreError::StoreFault(format!("cannot decode {}: {e}", R::NAME))
        })?;
        Ok(Document {
            id: stored.id,
            fields,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }
}

/// CRUD over the collection holding resources of type `R`.
pub struct Collection<R> {
    store: Arc<dyn DocumentStore>,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for Collection<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> Collection<R> {
    /// Opens the collection, creating the unique indexes `R` declares.
    pub async fn open(store: Arc<dyn DocumentStore>) -> Result<Self, StoreError> {
        for field in R::UNIQUE_FIELDS {
            store.ensure_unique_index(R::COLLECTION, field).await?;
        }
        Ok(Self {
            store,
            _resource: PhantomData,
        })
    }

    /// All resources in store-native order.
    pub async fn list(&self) -> Result<Vec<Document<R>>, StoreError> {
        self.store
            .find_all(R::COLLECTION)
            .await?
            .into_iter()
            .map(Document::try_from)
            .collect()
    }

    pub async fn get(&self, id: &str) -> Result<Document<R>, StoreError> {
        let id = parse_id::<R>(id)?;
        match self.store.find_by_id(R::COLLECTION, &id).await? {
            Some(stored) => Document::try_from(stored),
            None => Err(StoreError::NotFound),
        }
    }

    /// Validates `fields` and inserts the resulting resource.
    pub async fn create(&self, fields: R::Fields) -> Result<Document<R>, StoreError> {
        let resource = prepare::<R>(fields)?;
        let stored = self.store.insert(R::COLLECTION, encode(&resource)?).await?;
        Document::try_from(stored)
    }

    /// Validates `fields` and replaces every mutable field of resource `id` with them.
    ///
    /// Validation runs before the identifier is looked at, so an invalid body is reported as
    /// [`StoreError::ValidationFailed`] whatever the identifier.
    pub async fn update(&self, id: &str, fields: R::Fields) -> Result<Document<R>, StoreError> {
        let resource = prepare::<R>(fields)?;
        let id = parse_id::<R>(id)?;
        match self
            .store
            .replace(R::COLLECTION, &id, encode(&resource)?)
            .await?
        {
            Some(stored) => Document::try_from(stored),
            None => Err(StoreError::NotFound),
        }
    }

    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = parse_id::<R>(id)?;
        if self.store.remove(R::COLLECTION, &id).await? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}

fn parse_id<R: Resource>(id: &str) -> Result<DocumentId, StoreError> {
    id.parse::<DocumentId>().map_err(|e| {
        tracing::debug!(collection = R::COLLECTION, id, error = %e, "malformed identifier");
        StoreError::NotFound
    })
}

fn encode<R: Resource>(resource: &R) -> Result<Body, StoreError> {
    match serde_json::to_value(resource) {
        Ok(Value::Object(body)) => Ok(body),
        Ok(other) => Err(StoreError::StoreFault(format!(
            "{} encodes as {other}, not an object",
            R::NAME
        ))),
        Err(e) => Err(StoreError::StoreFault(e.to_string())),
    }
}
