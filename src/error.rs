use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::state::TimerError;

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request did not identify a live session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Session lacks the capability required by the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Timer command rejected by the domain rules.
    #[error(transparent)]
    Timer(#[from] TimerError),
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Missing or unknown session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Capability not granted.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::Forbidden(message) => AppError::Forbidden(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::Timer(err) => err.into(),
        }
    }
}

impl From<TimerError> for AppError {
    fn from(err: TimerError) -> Self {
        match err {
            TimerError::InvalidStep { .. }
            | TimerError::InsufficientBudget { .. }
            | TimerError::InvalidDeliberationAmount { .. } => AppError::BadRequest(err.to_string()),
            TimerError::WrongMode(_) => AppError::Conflict(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
