use serde::{Deserialize, Serialize};

use crate::schema::{Resource, ValidationError, Violations, is_present};

//////////////////////////////////////////////// User //////////////////////////////////////////////////

/// A user in the `users` collection. `email` is unique across the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Request body for creating or replacing a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

impl UserFields {
    /// Fields carrying only the required name and email.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

impl Resource for User {
    type Fields = UserFields;

    const NAME: &'static str = "User";
    const COLLECTION: &'static str = "users";
    const UNIQUE_FIELDS: &'static [&'static str] = &["email"];

    fn from_fields(fields: UserFields) -> Result<Self, ValidationError> {
        if !is_present(&fields.name) || !is_present(&fields.email) {
            return Err(ValidationError::MissingRequired {
                message: "Name and email are required",
            });
        }
        Ok(User {
            name: fields.name.unwrap_or_default(),
            email: fields.email.unwrap_or_default(),
            age: fields.age,
            role: fields.role,
            is_active: fields.is_active,
        })
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Violations::new(Self::NAME);
        violations.check(!self.name.is_empty(), "name", "Name is required");
        violations.check(!self.email.is_empty(), "email", "Email is required");
        violations.finish()
    }
}
