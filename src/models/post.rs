use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::PostScore;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub topic: String,
    pub creator: i64,
    pub created_at: DateTime<Utc>,
    pub is_edited: bool,
}

// Create post request
#[derive(Debug, Validate, Deserialize)]
pub struct CreatePostRequest {
    #[validate(length(max = 100, message = "Post title too long."))]
    pub title: String,
    #[validate(length(max = 3000, message = "Post description too long."))]
    #[serde(default)]
    pub body: String,
    pub topic: String,
}

// Update post request
#[derive(Debug, Validate, Deserialize)]
pub struct UpdatePostRequest {
    #[validate(length(max = 100, message = "Post title too long."))]
    pub title: String,
    #[validate(length(max = 3000, message = "Post description too long."))]
    #[serde(default)]
    pub body: String,
}

// Post with its derived score and the viewer's own vote
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub topic: String,
    pub creator: i64,
    pub created_at: DateTime<Utc>,
    pub is_edited: bool,
    pub score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<i32>,
}

impl PostResponse {
    pub fn new(post: Post, score: PostScore) -> Self {
        Self {
            id: post.id,
            title: post.title,
            body: post.body,
            topic: post.topic,
            creator: post.creator,
            created_at: post.created_at,
            is_edited: post.is_edited,
            score: score.score,
            user_vote: score.user_vote,
        }
    }
}
