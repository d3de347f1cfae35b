use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

///////////////////////////////////////////// DocumentId /////////////////////////////////////////////

/// Store-assigned identifier of a document.
///
/// Identifiers are random (v4) UUIDs rendered in hyphenated form. They are assigned once on insert
/// and never reused or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Wraps an existing UUID.
    pub fn new(uuid: Uuid) -> Self {
        DocumentId(uuid)
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        DocumentId(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

/////////////////////////////////////////// Display and FromStr ///////////////////////////////////////

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Error returned when a string is not a document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentIdParseError {
    #[error("document id must not be empty")]
    Empty,
    #[error("invalid document id {0:?}")]
    InvalidFormat(String),
}

impl FromStr for DocumentId {
    type Err = DocumentIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DocumentIdParseError::Empty);
        }
        Uuid::parse_str(s)
            .map(DocumentId)
            .map_err(|_| DocumentIdParseError::InvalidFormat(s.to_string()))
    }
}
