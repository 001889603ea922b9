pub mod auth;
pub mod comments;
pub mod posts;
pub mod topics;
pub mod users;

use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` extractor whose rejections render as `AppError::BadRequest`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
