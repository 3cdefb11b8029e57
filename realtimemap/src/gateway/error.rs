//! Mapping of handler errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::error::ActorError;

/// Errors returned by gateway handlers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The organization id is not in the catalog.
    #[error("Organization {0} not found")]
    OrganizationNotFound(String),

    /// An actor query failed.
    #[error(transparent)]
    Actor(#[from] ActorError),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        match self {
            GatewayError::OrganizationNotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "message": self.to_string() })),
            )
                .into_response(),
            GatewayError::Actor(e) => {
                error!(error = %e, "query failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({ "error": e.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
