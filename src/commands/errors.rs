//! # Command Error Handling
//!
//! This module provides error handling utilities for shelfctl commands
//! using the handled crate for consistent error property extraction.

use handled::Handle;

use crate::DocumentIdParseError;
use crate::http_utils::ClientError;

/// User-friendly error information that can be extracted from various error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    /// The main error message to display to the user
    pub message: String,
    /// Optional usage hint to help the user correct the error
    pub usage_hint: Option<String>,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Handle<UserError> for UserError {
    fn handle(&self) -> Option<UserError> {
        Some(self.clone())
    }
}

impl Handle<UserError> for ClientError {
    fn handle(&self) -> Option<UserError> {
        let message = match self {
            ClientError::Http(e) if e.is_connect() => {
                return Some(UserError {
                    message: format!("Could not reach the server: {}", e),
                    usage_hint: Some(
                        "Check that bookshelfd is running and --base-url points at it".to_string(),
                    ),
                });
            }
            ClientError::Http(e) => format!("Request failed: {}", e),
            ClientError::Api { status, .. } => format!("HTTP {}: {}", status.as_u16(), self),
        };

        let usage_hint = match self.status().map(|s| s.as_u16()) {
            Some(404) => Some(
                "The requested resource was not found. Check the ID and try again.".to_string(),
            ),
            Some(400) => Some("Invalid request. Check your input data and try again.".to_string()),
            Some(500..=599) => {
                Some("Server error. The service may be temporarily unavailable.".to_string())
            }
            _ => None,
        };

        Some(UserError {
            message,
            usage_hint,
        })
    }
}

impl Handle<UserError> for DocumentIdParseError {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: format!("Invalid ID: {}", self),
            usage_hint: Some(
                "IDs are UUIDs such as 67e55044-10b1-426f-9247-bb680e5fe0c8".to_string(),
            ),
        })
    }
}

impl Handle<UserError> for serde_json::Error {
    fn handle(&self) -> Option<UserError> {
        Some(UserError {
            message: format!("JSON parsing error: {}", self),
            usage_hint: Some(
                "Pass the fields as one JSON object, e.g. '{\"title\": \"1984\", \"author\": \"Orwell\"}'"
                    .to_string(),
            ),
        })
    }
}

/// Enhanced error formatting for CLI output
pub fn format_cli_error<E>(error: &E) -> String
where
    E: Handle<UserError> + std::fmt::Display,
{
    if let Some(user_error) = error.handle() {
        let mut output = format!("Error: {}", user_error.message);
        if let Some(hint) = user_error.usage_hint {
            output.push_str(&format!("\nHint: {}", hint));
        }
        output
    } else {
        format!("Error: {}", error)
    }
}
