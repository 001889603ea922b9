use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{auth::TokenError, store::StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Storage(StoreError::UnknownPost(_)) => StatusCode::BAD_REQUEST,
            AppError::Storage(StoreError::UnknownUser(_)) => StatusCode::UNAUTHORIZED,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Token(_) | AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Storage(StoreError::UnknownPost(post_id)) => {
                format!("Post {} does not exist", post_id)
            }
            AppError::Storage(StoreError::UnknownUser(user_id)) => {
                tracing::warn!(user_id, "Valid token for a deleted user");
                "User no longer exists".to_string()
            }
            AppError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Token(TokenError::Signing(ref e)) => {
                tracing::error!("Token signing error: {:?}", e);
                "Internal server error".to_string()
            }
            AppError::Token(ref e) => e.to_string(),
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                "Internal server error".to_string()
            }
            AppError::Validation(message)
            | AppError::Authentication(message)
            | AppError::Authorization(message)
            | AppError::NotFound(message)
            | AppError::Conflict(message)
            | AppError::BadRequest(message) => message,
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

// Validation helper
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();
        error_messages.sort();

        AppError::Validation(error_messages.join(", "))
    }
}

/// Maps a unique-constraint violation to `Conflict`, anything else to `Database`.
pub fn conflict_on_duplicate(err: sqlx::Error, message: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        e => AppError::Database(e),
    }
}

/// Maps a foreign-key violation to `BadRequest`, anything else to `Database`.
pub fn bad_reference(err: sqlx::Error, message: &str) -> AppError {
    match err {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::BadRequest(message.to_string())
        }
        e => AppError::Database(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_post_is_a_bad_request() {
        let err = AppError::from(StoreError::UnknownPost(4));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn vote_by_unknown_user_is_unauthorized() {
        let response = AppError::from(StoreError::UnknownUser(4)).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn storage_failures_are_server_errors() {
        let err = AppError::from(StoreError::Poisoned);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejected_tokens_are_unauthorized() {
        assert_eq!(
            AppError::from(TokenError::InvalidToken).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::from(TokenError::InvalidClaims).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn into_response_keeps_status() {
        let response = AppError::NotFound("Post not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
