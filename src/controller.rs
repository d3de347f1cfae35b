//! # Resource Controller
//!
//! HTTP handlers shared by every [`Resource`]. Each handler runs one [`Collection`] operation and
//! maps its outcome to a status code and a response [`Envelope`]:
//!
//! | Operation | Success | ValidationFailed | NotFound | DuplicateKey | StoreFault |
//! |-----------|---------|------------------|----------|--------------|------------|
//! | list      | 200     |                  |          |              | 500        |
//! | get       | 200     |                  | 404      |              | 500        |
//! | create    | 201     | 400              |          | 400          | 500        |
//! | update    | 200     | 400              | 404      | 400          | 500        |
//! | delete    | 204     |                  | 404      |              | 500        |
//!
//! Failures carry a short `error` and, where there is more to say, a `message`:
//!
//! ```json
//! {"success": false, "error": "Validation error", "message": "Book validation failed: year: Year must be valid"}
//! ```

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::collection::{Collection, Document};
use crate::schema::{Resource, ValidationError};
use crate::StoreError;

/////////////////////////////////////////////// Envelope ///////////////////////////////////////////////

/// The JSON shape of every response with a body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn failure(error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message,
        }
    }
}

/////////////////////////////////////////////// ApiError ///////////////////////////////////////////////

/// A failed request, rendered as `(status, Envelope)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>, message: Option<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, e.summary(), e.detail())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = Envelope::<()>::failure(self.error, self.message);
        (self.status, Json(envelope)).into_response()
    }
}

/// The controller operations, used to word store faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Short message for an unexpected fault, e.g. `Error fetching books`.
    pub fn fault_message<R: Resource>(self) -> String {
        let singular = R::NAME.to_lowercase();
        match self {
            Operation::List => format!("Error fetching {}", R::COLLECTION),
            Operation::Get => format!("Error fetching {singular}"),
            Operation::Create => format!("Error creating {singular}"),
            Operation::Update => format!("Error updating {singular}"),
            Operation::Delete => format!("Error deleting {singular}"),
        }
    }
}

/// Maps a store outcome to the response for `op` on resource `R`.
pub fn error_response<R: Resource>(op: Operation, err: StoreError) -> ApiError {
    match err {
        StoreError::ValidationFailed(e) => e.into(),
        StoreError::NotFound => {
            ApiError::new(StatusCode::NOT_FOUND, format!("{} not found", R::NAME), None)
        }
        StoreError::DuplicateKey { field } => ApiError::new(
            StatusCode::BAD_REQUEST,
            format!("{} already exists", capitalize(&field)),
            None,
        ),
        StoreError::StoreFault(message) => {
            tracing::error!(collection = R::COLLECTION, ?op, error = %message, "store fault");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                op.fault_message::<R>(),
                Some(message),
            )
        }
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/////////////////////////////////////////////// JsonBody ///////////////////////////////////////////////

/// Extracts a JSON request body, reporting undecodable bodies as validation failures.
///
/// An empty body reads as `{}`, so a bodiless create fails the required-field check rather
/// than the decoder.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::from(ValidationError::Malformed(e.body_text()))
        })?;
        let body: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };
        serde_json::from_slice::<T>(body)
            .map(JsonBody)
            .map_err(|e| ValidationError::Malformed(e.to_string()).into())
    }
}

/////////////////////////////////////////////// Handlers ///////////////////////////////////////////////

type Reply<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

/// `GET /` on a collection.
pub async fn list<R: Resource>(State(collection): State<Collection<R>>) -> Reply<Vec<Document<R>>> {
    match collection.list().await {
        Ok(documents) => Ok((StatusCode::OK, Json(Envelope::ok(documents)))),
        Err(e) => Err(error_response::<R>(Operation::List, e)),
    }
}

/// `GET /:id` on a collection.
pub async fn get<R: Resource>(
    State(collection): State<Collection<R>>,
    Path(id): Path<String>,
) -> Reply<Document<R>> {
    match collection.get(&id).await {
        Ok(document) => Ok((StatusCode::OK, Json(Envelope::ok(document)))),
        Err(e) => Err(error_response::<R>(Operation::Get, e)),
    }
}

/// `POST /` on a collection.
pub async fn create<R: Resource>(
    State(collection): State<Collection<R>>,
    JsonBody(fields): JsonBody<R::Fields>,
) -> Reply<Document<R>> {
    match collection.create(fields).await {
        Ok(document) => Ok((StatusCode::CREATED, Json(Envelope::ok(document)))),
        Err(e) => Err(error_response::<R>(Operation::Create, e)),
    }
}

/// `PUT /:id` on a collection.
pub async fn update<R: Resource>(
    State(collection): State<Collection<R>>,
    Path(id): Path<String>,
    JsonBody(fields): JsonBody<R::Fields>,
) -> Reply<Document<R>> {
    match collection.update(&id, fields).await {
        Ok(document) => Ok((StatusCode::OK, Json(Envelope::ok(document)))),
        Err(e) => Err(error_response::<R>(Operation::Update, e)),
    }
}

/// `DELETE /:id` on a collection. Succeeds with an empty 204.
pub async fn delete<R: Resource>(
    State(collection): State<Collection<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    match collection.delete(&id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(error_response::<R>(Operation::Delete, e)),
    }
}
