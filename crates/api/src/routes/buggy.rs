//! Error-shape demonstration endpoints.
//!
//! Each handler fails on purpose so clients can exercise their error
//! handling against every problem response the API produces.

use axum::Json;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::services::auth::validation::validate_registration;

/// `GET /api/buggy/not-found`
pub async fn not_found() -> Result<Json<Value>> {
    Err(AppError::NotFound("This resource does not exist".to_string()))
}

/// `GET /api/buggy/bad-request`
pub async fn bad_request() -> Result<Json<Value>> {
    Err(AppError::BadRequest("This is a bad request".to_string()))
}

/// `GET /api/buggy/unauthorized`
pub async fn unauthorized() -> Result<Json<Value>> {
    Err(AppError::Unauthorized("You are not authorized".to_string()))
}

/// `GET /api/buggy/validation-error`
pub async fn validation_error() -> Result<Json<Value>> {
    let (_, issues) = validate_registration("", "not-an-email", "short");
    Err(AppError::Validation(issues))
}

/// `GET /api/buggy/server-error`
pub async fn server_error() -> Result<Json<Value>> {
    Err(AppError::Internal("This is a server error".to_string()))
}
