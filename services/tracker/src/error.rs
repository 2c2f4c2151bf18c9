//! Custom error types for the tracker service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use thiserror::Error;
use tracing::{error, warn};

/// Body sent for any failure we do not explain to the client
const SERVER_ERROR_MESSAGE: &str = "SERVER ERROR";

/// Custom error type for the tracker service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed input (missing field, bad number, unparseable date)
    #[error("{0}")]
    Validation(String),

    /// Path id that cannot name any user
    #[error("Invalid user id: {0}")]
    InvalidId(String),

    /// User lookup came back empty
    #[error("User not found")]
    NotFound,

    /// Body that could not be decoded as JSON or form data
    #[error("{message}")]
    MalformedBody { status: StatusCode, message: String },

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    /// HTTP status the error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MalformedBody { status, .. } => *status,
            ApiError::Database(DatabaseError::Rejected(_)) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Plain-text body sent to the client
    fn message(&self) -> String {
        match self {
            ApiError::Database(DatabaseError::Rejected(reason)) => reason.clone(),
            ApiError::Database(_) => SERVER_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        (status, self.message()).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
