use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{db::StorageError, validation::ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Env error: {0}")]
    EnvError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<crate::validation::FieldError>,
}

impl ErrorBody {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Vec::new(),
        }
    }
}

pub type ErrorResponse = (StatusCode, Json<ErrorBody>);

impl AppError {
    pub fn to_response(&self) -> ErrorResponse {
        match self {
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "Invalid review".into(),
                    details: e.errors.clone(),
                }),
            ),
            // backend detail stays in the log
            AppError::Storage(_) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody::message("Review storage is unavailable")),
            ),
            AppError::EnvError(_) | AppError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::message("Unexpected server error")),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, Json(ErrorBody::message(msg))),
        }
    }
}
