//! HTTP-facing error type.
//!
//! Handlers return `Result<_, ApiError>`; the responder renders the same
//! `{"error": ...}` body for every failure. Server-side failures are logged
//! and reported to the client with a generic message.

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, status::Custom, Responder};
use rocket::serde::json::Json;
use serde_json::json;
use thiserror::Error;

use crate::blob::BlobError;
use crate::store::StoreError;
use crate::utils::midtrans::GatewayError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Blob(#[from] BlobError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::BadRequest(_) => Status::BadRequest,
            ApiError::Validation(_) => Status::UnprocessableEntity,
            ApiError::Unauthorized(_) => Status::Unauthorized,
            ApiError::Forbidden(_) => Status::Forbidden,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Conflict(_) => Status::Conflict,
            ApiError::Store(_)
            | ApiError::Blob(_)
            | ApiError::Gateway(_)
            | ApiError::Internal(_) => Status::InternalServerError,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Store(_) => "Database error".to_string(),
            ApiError::Blob(_) => "File upload failed".to_string(),
            ApiError::Gateway(_) => "Failed to create payment transaction".to_string(),
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status == Status::InternalServerError {
            tracing::error!(
                method = %request.method(),
                uri = %request.uri(),
                error = %self,
                "request failed"
            );
        }
        Custom(status, Json(json!({ "error": self.public_message() }))).respond_to(request)
    }
}
