//! API endpoint handlers.

pub mod diagnostic;
pub mod health;

use axum::http::Uri;

use crate::api::error::ApiError;

/// Fallback for unknown routes, so 404s use the same error envelope.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
