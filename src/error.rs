//! Error types for Trainstore.
//!
//! Uses thiserror for ergonomic error definitions that integrate
//! with axum's response system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Auth errors
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,

    // Resource errors
    #[error("Not found")]
    NotFound,

    #[error("Project already has maximum allowed amount of training data")]
    LimitExceeded,

    // Training payload validation errors
    #[error("Missing data")]
    MissingData,

    #[error("Empty audio is not allowed")]
    EmptyData,

    #[error("Invalid audio input")]
    InvalidData,

    #[error("Audio exceeds maximum allowed length")]
    TooLong,

    // Other request validation
    #[error("{0}")]
    InvalidInput(String),

    // External service errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 401
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,

            // 403
            Self::Forbidden => StatusCode::FORBIDDEN,

            // 404
            Self::NotFound => StatusCode::NOT_FOUND,

            // 409
            Self::LimitExceeded => StatusCode::CONFLICT,

            // 400
            Self::MissingData
            | Self::EmptyData
            | Self::InvalidData
            | Self::TooLong
            | Self::InvalidInput(_) => StatusCode::BAD_REQUEST,

            // 500
            Self::Database(_) | Self::Internal(_) | Self::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message rendered to the client. Server-side failures get a fixed
    /// message so internals never leak onto the wire.
    fn client_message(&self) -> String {
        match self {
            Self::Database(_) => "Error accessing the database used to store data".to_string(),
            Self::Internal(_) | Self::Other(_) => "Error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({ "error": self.client_message() }));

        (status, body).into_response()
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidInput(format!("JSON parsing error: {}", err))
    }
}
