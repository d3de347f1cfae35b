use serde::{Deserialize, Serialize};

use crate::schema::{Resource, ValidationError, Violations, current_year, is_present};

const TITLE_MAX_CHARS: usize = 200;
const AUTHOR_MAX_CHARS: usize = 100;
const EARLIEST_YEAR: i64 = 1000;
const YEARS_AHEAD: i64 = 10;

//////////////////////////////////////////////// Book //////////////////////////////////////////////////

/// A book in the `books` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub is_available: bool,
}

/// Request body for creating or replacing a book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub year: Option<i64>,
    pub is_available: Option<bool>,
}

impl BookFields {
    /// Fields carrying only the required title and author.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            ..Self::default()
        }
    }
}

impl Resource for Book {
    type Fields = BookFields;

    const NAME: &'static str = "Book";
    const COLLECTION: &'static str = "books";

    fn from_fields(fields: BookFields) -> Result<Self, ValidationError> {
        if !is_present(&fields.title) || !is_present(&fields.author) {
            return Err(ValidationError::MissingRequired {
                message: "Title and author are required",
            });
        }
        Ok(Book {
            title: fields.title.unwrap_or_default().trim().to_string(),
            author: fields.author.unwrap_or_default().trim().to_string(),
            year: fields.year.unwrap_or_else(current_year),
            is_available: fields.is_available.unwrap_or(true),
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new(Self::NAME);
        violations.check(!self.title.is_empty(), "title", "Title is required");
        violations.check(
            self.title.chars().count() <= TITLE_MAX_CHARS,
            "title",
            "Title cannot exceed 200 characters",
        );
        violations.check(!self.author.is_empty(), "author", "Author is required");
        violations.check(
            self.author.chars().count() <= AUTHOR_MAX_CHARS,
            "author",
            "Author name cannot exceed 100 characters",
        );
        violations.check(self.year >= EARLIEST_YEAR, "year", "Year must be valid");
        violations.check(
            self.year <= current_year() + YEARS_AHEAD,
            "year",
            "Year cannot be too far in the future",
        );
        violations.finish()
    }
}
