use std::sync::Arc;

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use axum::routing::{MethodRouter, get};

use crate::collection::Collection;
use crate::controller::{self, ApiError};
use crate::data_store::DocumentStore;
use crate::schema::Resource;
use crate::{Book, StoreError, User};

/// Body of `GET /`.
pub const HEALTH_MESSAGE: &str = "Backend is running successfully";

/// Routes `/{collection}`, `/{collection}/` and `/{collection}/:id` to the controller
/// operations for `R`.
pub fn create_resource_router<R: Resource>(collection: Collection<R>) -> Router {
    let base = format!("/{}", R::COLLECTION);
    let list_and_create = || -> MethodRouter {
        get(controller::list::<R>)
            .post(controller::create::<R>)
            .with_state(collection.clone())
    };
    Router::new()
        .route(&base, list_and_create())
        .route(&format!("{base}/"), list_and_create())
        .route(
            &format!("{base}/:id"),
            get(controller::get::<R>)
                .put(controller::update::<R>)
                .delete(controller::delete::<R>)
                .with_state(collection),
        )
}

/// Builds the full API over `store`: `/books`, `/users` and the `/` health check.
///
/// Opening the collections creates their unique indexes, which is why this can fail.
pub async fn create_router(store: Arc<dyn DocumentStore>) -> Result<Router, StoreError> {
    let books = Collection::<Book>::open(Arc::clone(&store)).await?;
    let users = Collection::<User>::open(store).await?;

    Ok(Router::new()
        .route("/", get(health))
        .merge(create_resource_router(books))
        .merge(create_resource_router(users))
        .fallback(route_not_found)
        .layer(middleware::from_fn(log_request)))
}

async fn route_not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Route not found", None)
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    tracing::info!(%method, %uri, status = response.status().as_u16(), "request");
    response
}
