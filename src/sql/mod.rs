//! PostgreSQL database operations for bookshelf.
//!
//! [`PgDocumentStore`] implements [`DocumentStore`] on top of the per-table functions in
//! [`document`], running each operation in its own transaction.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::data_store::{Body, DocumentStore, StoredDocument};
use crate::{DataStoreError, DocumentId};

/// Document operations with automatic timestamp tracking.
pub mod document;

/// Applies the embedded migrations from `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DataStoreError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DataStoreError::Internal(format!("migration failed: {e}")))
}

/// Reverts every applied migration newer than `target`. A `target` of 0 reverts them all.
pub async fn revert_migrations(pool: &PgPool, target: i64) -> Result<(), DataStoreError> {
    sqlx::migrate!("./migrations")
        .undo(pool, target)
        .await
        .map_err(|e| DataStoreError::Internal(format!("migration revert failed: {e}")))
}

/// A [`DocumentStore`] backed by PostgreSQL, one table per collection.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, DataStoreError> {
        self.pool.begin().await.map_err(|e| {
            tracing::error!(error = %e, "failed to begin transaction");
            DataStoreError::from(e)
        })
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> Result<(), DataStoreError> {
    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, "failed to commit transaction");
        DataStoreError::from(e)
    })
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn ensure_unique_index(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<(), DataStoreError> {
        let mut tx = self.begin().await?;
        document::ensure_unique_index(&mut tx, collection, field).await?;
        commit(tx).await
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<StoredDocument>, DataStoreError> {
        let mut tx = self.begin().await?;
        let documents = document::list(&mut tx, collection).await?;
        commit(tx).await?;
        Ok(documents)
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &DocumentId,
    ) -> Result<Option<StoredDocument>, DataStoreError> {
        let mut tx = self.begin().await?;
        let found = document::get(&mut tx, collection, id).await?;
        commit(tx).await?;
        Ok(found)
    }

    async fn insert(&self, collection: &str, body: Body) -> Result<StoredDocument, DataStoreError> {
        let mut tx = self.begin().await?;
        let created = document::insert(&mut tx, collection, body).await?;
        commit(tx).await?;
        Ok(created)
    }

    async fn replace(
        &self,
        collection: &str,
        id: &DocumentId,
        body: Body,
    ) -> Result<Option<StoredDocument>, DataStoreError> {
        let mut tx = self.begin().await?;
        let replaced = document::replace(&mut tx, collection, id, body).await?;
        commit(tx).await?;
        Ok(replaced)
    }

    async fn remove(&self, collection: &str, id: &DocumentId) -> Result<bool, DataStoreError> {
        let mut tx = self.begin().await?;
        let removed = document::delete(&mut tx, collection, id).await?;
        commit(tx).await?;
        Ok(removed)
    }
}
