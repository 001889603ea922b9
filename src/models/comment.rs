use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub post: i64,
    pub creator: i64,
    pub created_at: DateTime<Utc>,
    pub is_edited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<i64>,
}

// Create comment request
#[derive(Debug, Validate, Deserialize)]
pub struct CreateCommentRequest {
    pub post: i64,
    #[validate(length(max = 500, message = "Comment body too long."))]
    pub body: String,
    pub parent: Option<i64>,
}

// Update comment request
#[derive(Debug, Validate, Deserialize)]
pub struct UpdateCommentRequest {
    #[validate(length(max = 500, message = "Comment body too long."))]
    pub body: String,
}
