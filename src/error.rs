//! Error types for jukebox
//!
//! Every failure is terminal for its request and surfaces as an HTTP status.

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Main error type for request handling and the stores
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad username/password pair
    #[error("Invalid credentials")]
    AuthenticationFailure,

    /// Authenticated, but not allowed to touch the target
    #[error("Insufficient privilege")]
    AuthorizationFailure,

    /// No session on a page that needs one
    #[error("Login required")]
    LoginRequired,

    /// Missing target resource
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Username uniqueness violated
    #[error("Username already exists: {0}")]
    UsernameTaken(String),

    /// Rejected form input
    #[error("Bad request: {0}")]
    Validation(String),

    /// Database connection or query errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Convenience Result type using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthenticationFailure | AppError::AuthorizationFailure => {
                StatusCode::FORBIDDEN
            }
            AppError::LoginRequired => StatusCode::SEE_OTHER,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UsernameTaken(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::LoginRequired => HttpResponse::SeeOther()
                .insert_header((header::LOCATION, "/login"))
                .finish(),
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!("Request failed: {}", self);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "msg": "Internal server error"
                }))
            }
            _ => HttpResponse::build(self.status_code()).json(serde_json::json!({
                "msg": self.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::AuthenticationFailure.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::AuthorizationFailure.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::NotFound("User").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::UsernameTaken("alice".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_login_required_redirects() {
        let resp = AppError::LoginRequired.error_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            "/login"
        );
    }
}
