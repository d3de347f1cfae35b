//! Error types for bookshelf operations.

use thiserror::Error;

use crate::schema::ValidationError;

/// Errors raised by a document store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataStoreError {
    /// A write collided with a unique index.
    #[error("duplicate key on field {field}")]
    DuplicateKey {
        /// The indexed field whose value collided.
        field: String,
    },
    /// The collection or field name cannot be used by this backend.
    #[error("invalid name {0:?}")]
    InvalidName(String),
    /// A document body could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// An internal storage system error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for DataStoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                let field = match (db_err.table(), db_err.constraint()) {
                    (Some(table), Some(constraint)) => unique_index_field(table, constraint),
                    (None, Some(constraint)) => constraint.to_string(),
                    _ => "unknown".to_string(),
                };
                DataStoreError::DuplicateKey { field }
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DataStoreError::Serialization(e.to_string())
            }
            _ => DataStoreError::Internal(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataStoreError {
    fn from(e: serde_json::Error) -> Self {
        DataStoreError::Serialization(e.to_string())
    }
}

/// Recovers the field from a unique index named `{table}_{field}_key`.
pub(crate) fn unique_index_field(table: &str, index: &str) -> String {
    index
        .strip_prefix(table)
        .and_then(|rest| rest.strip_prefix('_'))
        .and_then(|rest| rest.strip_suffix("_key"))
        .unwrap_or(index)
        .to_string()
}

/// Outcome of a failed resource operation.
///
/// This is the closed set of failures the store adapter hands to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Missing or out-of-range input.
    #[error(transparent)]
    ValidationFailed(#[from] ValidationError),
    /// No entity at the identifier, including malformed identifiers.
    #[error("not found")]
    NotFound,
    /// A unique field collided with an existing entity.
    #[error("duplicate value for {field}")]
    DuplicateKey {
        /// The unique field.
        field: String,
    },
    /// Any other store-level failure.
    #[error("{0}")]
    StoreFault(String),
}

impl From<DataStoreError> for StoreError {
    fn from(e: DataStoreError) -> Self {
        match e {
            DataStoreError::DuplicateKey { field } => StoreError::DuplicateKey { field },
            other => StoreError::StoreFault(other.to_string()),
        }
    }
}
