use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

use super::AppJson;
use crate::{
    AppState,
    auth::{AuthUser, OptionalAuthUser},
    error::{AppError, Result},
    models::{
        CreatePostRequest, Post, PostResponse, UpdatePostRequest, VoteAction, VoteRequest,
        VoteResponse,
    },
    services::{post_service, vote_service},
};

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    auth_user: OptionalAuthUser,
) -> Result<Json<PostResponse>> {
    let post = post_service::get_post_by_id_raw(&state.db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let score =
        vote_service::compute_score(state.votes.as_ref(), post_id, auth_user.user_id()).await?;

    Ok(Json(PostResponse::new(post, score)))
}

/// Score straight from the vote store. Does not look the post up, so a post
/// that does not exist (or was deleted) reads as score 0 rather than 404.
pub async fn get_post_score(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    auth_user: OptionalAuthUser,
) -> Result<Json<VoteResponse>> {
    let score =
        vote_service::compute_score(state.votes.as_ref(), post_id, auth_user.user_id()).await?;

    Ok(Json(VoteResponse::new(post_id, score)))
}

pub async fn create_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>)> {
    payload.validate()?;

    let post = post_service::create_post(&state.db, auth_user.user_id, &payload).await?;
    tracing::info!(post_id = post.id, user_id = auth_user.user_id, "Post created");

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(post_id): Path<i64>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<Json<Post>> {
    payload.validate()?;

    post_service::get_owned_post(&state.db, post_id, auth_user.user_id).await?;
    let post = post_service::update_post(&state.db, post_id, &payload).await?;

    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(post_id): Path<i64>,
) -> Result<StatusCode> {
    post_service::get_owned_post(&state.db, post_id, auth_user.user_id).await?;
    post_service::delete_post(&state.db, post_id).await?;
    tracing::info!(post_id, user_id = auth_user.user_id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn vote_post(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(payload): AppJson<VoteRequest>,
) -> Result<Response> {
    let VoteRequest { post_id, action } = payload;

    vote_service::apply_vote(state.votes.as_ref(), post_id, auth_user.user_id, action).await?;

    if action == VoteAction::Clear {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let score =
        vote_service::compute_score(state.votes.as_ref(), post_id, Some(auth_user.user_id))
            .await?;

    Ok((StatusCode::CREATED, Json(VoteResponse::new(post_id, score))).into_response())
}
