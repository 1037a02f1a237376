use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use inbox_types::api::ErrorResponse;

use crate::validation::ValidationError;

/// Everything a handler can fail with. Nothing propagates past the handler:
/// each variant maps to a status code and the `{success:false}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid request body")]
    MalformedBody,
    #[error("internal server error")]
    Persistence(#[from] anyhow::Error),
    #[error("API endpoint not found")]
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody => StatusCode::BAD_REQUEST,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Persistence(e) = &self {
            // Storage details stay in the log; the client gets the generic text.
            error!("Database error: {:#}", e);
        }
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}
