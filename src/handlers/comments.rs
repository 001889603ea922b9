use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use super::AppJson;
use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, Result},
    models::{Comment, CreateCommentRequest, UpdateCommentRequest},
    services::{comment_service, post_service},
};

pub async fn get_post_comments(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> Result<Json<Vec<Comment>>> {
    post_service::get_post_by_id_raw(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let comments = comment_service::get_post_comments(&state.db, post_id).await?;
    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(payload): AppJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    payload.validate()?;

    let comment = comment_service::create_comment(&state.db, auth_user.user_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(comment_id): Path<i64>,
    AppJson(payload): AppJson<UpdateCommentRequest>,
) -> Result<Json<Comment>> {
    payload.validate()?;

    comment_service::get_owned_comment(&state.db, comment_id, auth_user.user_id).await?;
    let comment = comment_service::update_comment(&state.db, comment_id, &payload).await?;

    Ok(Json(comment))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(comment_id): Path<i64>,
) -> Result<StatusCode> {
    comment_service::get_owned_comment(&state.db, comment_id, auth_user.user_id).await?;
    comment_service::delete_comment(&state.db, comment_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
