use sqlx::PgPool;

use crate::{
    error::{AppError, Result, bad_reference},
    models::{Comment, CreateCommentRequest, UpdateCommentRequest},
};

const COMMENT_COLUMNS: &str = "id, body, post, creator, created_at, is_edited, parent";

pub async fn get_comment_by_id_raw(db: &PgPool, comment_id: i64) -> Result<Option<Comment>> {
    let comment = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments WHERE id = $1",
        COMMENT_COLUMNS
    ))
    .bind(comment_id)
    .fetch_optional(db)
    .await?;

    Ok(comment)
}

/// Comments on a post, oldest first.
pub async fn get_post_comments(db: &PgPool, post_id: i64) -> Result<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments WHERE post = $1 ORDER BY created_at ASC, id ASC",
        COMMENT_COLUMNS
    ))
    .bind(post_id)
    .fetch_all(db)
    .await?;

    Ok(comments)
}

pub async fn create_comment(
    db: &PgPool,
    creator: i64,
    request: &CreateCommentRequest,
) -> Result<Comment> {
    if let Some(parent_id) = request.parent {
        let parent = get_comment_by_id_raw(db, parent_id)
            .await?
            .ok_or_else(|| AppError::BadRequest("Parent comment not found".to_string()))?;

        if parent.post != request.post {
            return Err(AppError::BadRequest(
                "Parent comment belongs to another post".to_string(),
            ));
        }
    }

    let comment = sqlx::query_as::<_, Comment>(&format!(
        "INSERT INTO comments (post, creator, body, parent) VALUES ($1, $2, $3, $4) RETURNING {}",
        COMMENT_COLUMNS
    ))
    .bind(request.post)
    .bind(creator)
    .bind(&request.body)
    .bind(request.parent)
    .fetch_one(db)
    .await
    .map_err(|e| bad_reference(e, "Post not found"))?;

    Ok(comment)
}

pub async fn update_comment(
    db: &PgPool,
    comment_id: i64,
    request: &UpdateCommentRequest,
) -> Result<Comment> {
    sqlx::query_as::<_, Comment>(&format!(
        "UPDATE comments SET body = $1, is_edited = TRUE WHERE id = $2 RETURNING {}",
        COMMENT_COLUMNS
    ))
    .bind(&request.body)
    .bind(comment_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
}

pub async fn delete_comment(db: &PgPool, comment_id: i64) -> Result<()> {
    sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(comment_id)
        .execute(db)
        .await?;

    Ok(())
}

/// Loads a comment and checks that `user_id` wrote it.
pub async fn get_owned_comment(db: &PgPool, comment_id: i64, user_id: i64) -> Result<Comment> {
    let comment = get_comment_by_id_raw(db, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.creator != user_id {
        return Err(AppError::Authorization(
            "Can only modify your own comments".to_string(),
        ));
    }

    Ok(comment)
}
