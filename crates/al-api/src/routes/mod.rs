//! API routes.

pub mod health;
pub mod webtrigger;

use crate::error::ApiError;
use crate::state::AppState;
use axum::{http::Uri, Router};

/// Creates the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/webtrigger", webtrigger::routes())
        .merge(health::routes())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
