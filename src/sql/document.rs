//! Document operations for PostgreSQL database.
//!
//! Every collection is a table with columns `id UUID`, `body JSONB`, `created_at TIMESTAMPTZ`
//! and `updated_at TIMESTAMPTZ`. Table and field names are interpolated into SQL, so every
//! function here checks them with [`check_name`] first.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use crate::data_store::{Body, StoredDocument};
use crate::{DataStoreError, DocumentId};

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

/// Accepts lower-case identifiers: a letter followed by letters, digits or underscores.
pub fn check_name(name: &str) -> SqlResult<&str> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(DataStoreError::InvalidName(name.to_string()))
    }
}

fn document_from_row(row: &PgRow) -> SqlResult<StoredDocument> {
    let id: Uuid = row.try_get("id")?;
    let body: Json<Body> = row.try_get("body")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;
    Ok(StoredDocument {
        id: DocumentId::new(id),
        body: body.0,
        created_at,
        updated_at,
    })
}

/// Creates the unique expression index `{table}_{field}_key` on `body->>'field'`.
///
/// # Returns
/// * `Ok(())` - The index exists
/// * `Err(DataStoreError::DuplicateKey)` - Existing rows collide on `field`
/// * `Err(DataStoreError::InvalidName)` - `table` or `field` is not a plain identifier
pub async fn ensure_unique_index(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    field: &str,
) -> SqlResult<()> {
    let table = check_name(table)?;
    let field = check_name(field)?;

    let statement = format!(
        "CREATE UNIQUE INDEX IF NOT EXISTS {table}_{field}_key ON {table} ((body->>'{field}'))"
    );
    match sqlx::query(&statement).execute(&mut **tx).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let err = DataStoreError::from(e);
            if let DataStoreError::DuplicateKey { .. } = err {
                return Err(DataStoreError::DuplicateKey {
                    field: field.to_string(),
                });
            }
            tracing::error!(table, field, error = %err, "failed to create unique index");
            Err(err)
        }
    }
}

/// Lists every document in `table`, oldest first.
pub async fn list(tx: &mut Transaction<'_, Postgres>, table: &str) -> SqlResult<Vec<StoredDocument>> {
    let table = check_name(table)?;
    let statement =
        format!("SELECT id, body, created_at, updated_at FROM {table} ORDER BY created_at ASC");

    match sqlx::query(&statement).fetch_all(&mut **tx).await {
        Ok(rows) => rows.iter().map(document_from_row).collect(),
        Err(e) => {
            tracing::error!(table, error = %e, "database error listing documents");
            Err(e.into())
        }
    }
}

/// Retrieves one document.
///
/// # Returns
/// * `Ok(Some(StoredDocument))` - Document found
/// * `Ok(None)` - Document not found
pub async fn get(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    id: &DocumentId,
) -> SqlResult<Option<StoredDocument>> {
    let table = check_name(table)?;
    let statement =
        format!("SELECT id, body, created_at, updated_at FROM {table} WHERE id = $1");

    match sqlx::query(&statement)
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
    {
        Ok(Some(row)) => document_from_row(&row).map(Some),
        Ok(None) => Ok(None),
        Err(e) => {
            tracing::error!(table, %id, error = %e, "database error getting document");
            Err(e.into())
        }
    }
}

/// Inserts a document under a fresh identifier.
///
/// The `created_at` and `updated_at` timestamps are set to the current time.
///
/// # Examples
/// ```no_run
/// # use bookshelf::sql;
/// # use serde_json::json;
/// # use sqlx::PgPool;
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let body = json!({"title": "1984", "author": "Orwell"});
/// let mut tx = pool.begin().await?;
/// let doc = sql::document::insert(&mut tx, "books", body.as_object().unwrap().clone()).await?;
/// tx.commit().await?;
/// println!("created {}", doc.id);
/// # Ok(())
/// # }
/// ```
pub async fn insert(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    body: Body,
) -> SqlResult<StoredDocument> {
    let table = check_name(table)?;
    let id = DocumentId::generate();
    let statement = format!(
        "INSERT INTO {table} (id, body) VALUES ($1, $2) \
         RETURNING id, body, created_at, updated_at"
    );

    match sqlx::query(&statement)
        .bind(id.as_uuid())
        .bind(Json(&body))
        .fetch_one(&mut **tx)
        .await
    {
        Ok(row) => document_from_row(&row),
        Err(e) => {
            let err = DataStoreError::from(e);
            if !matches!(err, DataStoreError::DuplicateKey { .. }) {
                tracing::error!(table, error = %err, "database error inserting document");
            }
            Err(err)
        }
    }
}

/// Replaces a document body and sets `updated_at` to the current time.
///
/// # Returns
/// * `Ok(Some(StoredDocument))` - Document replaced
/// * `Ok(None)` - Document not found
pub async fn replace(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    id: &DocumentId,
    body: Body,
) -> SqlResult<Option<StoredDocument>> {
    let table = check_name(table)?;
    let statement = format!(
        "UPDATE {table} SET body = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $1 \
         RETURNING id, body, created_at, updated_at"
    );

    match sqlx::query(&statement)
        .bind(id.as_uuid())
        .bind(Json(&body))
        .fetch_optional(&mut **tx)
        .await
    {
        Ok(Some(row)) => document_from_row(&row).map(Some),
        Ok(None) => Ok(None),
        Err(e) => {
            let err = DataStoreError::from(e);
            if !matches!(err, DataStoreError::DuplicateKey { .. }) {
                tracing::error!(table, %id, error = %err, "database error replacing document");
            }
            Err(err)
        }
    }
}

/// Deletes a document.
///
/// # Returns
/// * `Ok(true)` - Document existed and was deleted
/// * `Ok(false)` - Document did not exist
pub async fn delete(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    id: &DocumentId,
) -> SqlResult<bool> {
    let table = check_name(table)?;
    let statement = format!("DELETE FROM {table} WHERE id = $1");

    match sqlx::query(&statement)
        .bind(id.as_uuid())
        .execute(&mut **tx)
        .await
    {
        Ok(result) => Ok(result.rows_affected() > 0),
        Err(e) => {
            tracing::error!(table, %id, error = %e, "database error deleting document");
            Err(e.into())
        }
    }
}
