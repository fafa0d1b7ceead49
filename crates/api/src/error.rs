//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.
//!
//! Every error response has a problem-details JSON body:
//!
//! ```json
//! { "title": "Product not found", "status": 400 }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::{AuthError, ValidationIssue};
use crate::services::basket::BasketError;
use crate::services::token::TokenError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Input failed validation; every issue is reported.
    #[error("Validation failed with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    /// A save completed without writing anything.
    #[error("Persistence failed: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Problem-details response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationIssue>>,
}

impl ProblemDetails {
    #[must_use]
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            errors: None,
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::Validation(_) | Self::Persistence(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Build the problem body. Internal details never reach the client.
    fn problem(self) -> ProblemDetails {
        let status = self.status();
        match self {
            Self::Database(RepositoryError::NotFound) => ProblemDetails::new(status, "Not found"),
            Self::Database(RepositoryError::Conflict(msg)) => ProblemDetails::new(status, msg),
            Self::Database(_) | Self::Internal(_) => {
                ProblemDetails::new(status, "Internal server error")
            }
            Self::NotFound(title)
            | Self::Unauthorized(title)
            | Self::BadRequest(title)
            | Self::Persistence(title) => ProblemDetails::new(status, title),
            Self::Validation(issues) => ProblemDetails {
                errors: Some(issues),
                ..ProblemDetails::new(status, "One or more validation errors occurred.")
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.status().is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        self.problem().into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::UserNotFound => {
                Self::Unauthorized("Invalid credentials".to_string())
            }
            AuthError::Validation(issues) => Self::Validation(issues),
            AuthError::Repository(e) => Self::Database(e),
            AuthError::Token(e) => Self::Internal(e.to_string()),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_string()),
        }
    }
}

impl From<BasketError> for AppError {
    fn from(err: BasketError) -> Self {
        match err {
            BasketError::NotFound => Self::NotFound("Basket not found".to_string()),
            BasketError::ProductNotFound(_) => Self::BadRequest("Product not found".to_string()),
            BasketError::NothingSaved => Self::Persistence("Problem saving changes to the basket".to_string()),
            BasketError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from the authenticated user name.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_name: &str, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(user_name.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}
