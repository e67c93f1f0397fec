use crate::api::models::Envelope;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("BSON encode error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("User not found")]
    UserNotFound,

    #[error("Movie not found")]
    MovieNotFound,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("store call exceeded {0:?}")]
    Timeout(std::time::Duration),

    #[error("rating for {0} kept changing underneath the update")]
    RatingConflict(String),

    #[error("comments on {0} kept changing underneath the update")]
    CommentConflict(String),
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::UserNotFound | CatalogError::MovieNotFound => StatusCode::NOT_FOUND,
            CatalogError::Store(_)
            | CatalogError::Timeout(_)
            | CatalogError::RatingConflict(_)
            | CatalogError::CommentConflict(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error returned by HTTP handlers, rendered as the `{status, body}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(e) => e.status(),
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "Invalid request",
            ApiError::Catalog(CatalogError::UserNotFound) => "User not found",
            ApiError::Catalog(CatalogError::MovieNotFound) => "Movie not found",
            ApiError::Catalog(CatalogError::RatingConflict(_)) => "Failed to update movie rating",
            ApiError::Catalog(CatalogError::CommentConflict(_)) => "Failed to add comment",
            ApiError::Catalog(CatalogError::Store(_) | CatalogError::Timeout(_)) => {
                "Internal server error"
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::InvalidRequest(reason) = &self {
            tracing::debug!("Rejected request body: {reason}");
        }
        let status = self.status();
        (status, Json(Envelope::new(status, self.message()))).into_response()
    }
}
