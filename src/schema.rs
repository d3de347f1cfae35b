//! Resource schemas.
//!
//! A [`Resource`] is the typed shape of the documents stored in one collection. Turning a request
//! body into a resource happens in two steps, mirroring how an ODM model behaves:
//!
//! 1. [`Resource::from_fields`] performs the required-field check on the raw request fields, fills
//!    in defaults and normalizes values (e.g. trimming).
//! 2. [`Resource::validate`] checks the declarative field constraints (length, numeric range) on
//!    the normalized value, right before it is persisted.
//!
//! [`prepare`] runs both steps.

use std::fmt::Debug;

use chrono::{Datelike, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A violated constraint on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// The field's wire name.
    pub path: &'static str,
    /// Human-readable description of the violation.
    pub message: String,
}

/// Why a create or update request was rejected before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields were absent or empty.
    #[error("{message}")]
    MissingRequired { message: &'static str },
    /// The normalized resource violated field constraints.
    #[error("{resource} validation failed: {}", join_violations(.violations))]
    Invalid {
        resource: &'static str,
        violations: Vec<FieldViolation>,
    },
    /// The request body could not be decoded into the resource's fields.
    #[error("{0}")]
    Malformed(String),
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.path, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Short message for the response envelope's `error` field.
    pub fn summary(&self) -> &str {
        match self {
            ValidationError::MissingRequired { message } => message,
            ValidationError::Invalid { .. } | ValidationError::Malformed(_) => "Validation error",
        }
    }

    /// Detail for the response envelope's `message` field.
    pub fn detail(&self) -> Option<String> {
        match self {
            ValidationError::MissingRequired { .. } => None,
            ValidationError::Invalid { .. } | ValidationError::Malformed(_) => {
                Some(self.to_string())
            }
        }
    }
}

/// Collects field violations for one resource.
#[derive(Debug)]
pub struct Violations {
    resource: &'static str,
    violations: Vec<FieldViolation>,
}

impl Violations {
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            violations: Vec::new(),
        }
    }

    /// Records a violation on `path` unless `holds` is true.
    pub fn check(&mut self, holds: bool, path: &'static str, message: impl Into<String>) {
        if !holds {
            self.violations.push(FieldViolation {
                path,
                message: message.into(),
            });
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid {
                resource: self.resource,
                violations: self.violations,
            })
        }
    }
}

/// The typed shape of the documents in one collection.
pub trait Resource:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Request body accepted by create and update.
    type Fields: DeserializeOwned + Send + 'static;

    /// Display name, e.g. `Book`.
    const NAME: &'static str;

    /// Collection holding this resource, e.g. `books`. Also the router prefix.
    const COLLECTION: &'static str;

    /// Fields whose values must be unique across the collection.
    const UNIQUE_FIELDS: &'static [&'static str] = &[];

    /// Required-field check, defaulting and normalization.
    fn from_fields(fields: Self::Fields) -> Result<Self, ValidationError>;

    /// Declarative field constraints, checked before every write.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Builds a resource from request fields and validates it.
pub fn prepare<R: Resource>(fields: R::Fields) -> Result<R, ValidationError> {
    let resource = R::from_fields(fields)?;
    resource.validate()?;
    Ok(resource)
}

/// True when a text field was supplied with a non-empty value.
pub fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// The current calendar year (UTC).
pub fn current_year() -> i64 {
    i64::from(Utc::now().year())
}
