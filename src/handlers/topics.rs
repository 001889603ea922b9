use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use super::AppJson;
use crate::{
    AppState,
    auth::{AuthUser, OptionalAuthUser},
    error::{AppError, Result},
    models::{CreateTopicRequest, PostResponse, Topic, UpdateTopicRequest},
    services::{post_service, topic_service},
};

pub async fn get_topics(State(state): State<AppState>) -> Result<Json<Vec<Topic>>> {
    let topics = topic_service::get_topics(&state.db).await?;
    Ok(Json(topics))
}

pub async fn get_topic(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Topic>> {
    let topic = topic_service::get_topic_by_name(&state.db, &name)
        .await?
        .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;

    Ok(Json(topic))
}

pub async fn create_topic(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(payload): AppJson<CreateTopicRequest>,
) -> Result<(StatusCode, Json<Topic>)> {
    payload.validate()?;

    let topic = topic_service::create_topic(&state.db, &payload).await?;
    tracing::info!(user_id = auth_user.user_id, topic = %topic.name, "Topic created");

    Ok((StatusCode::CREATED, Json(topic)))
}

pub async fn update_topic(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(name): Path<String>,
    AppJson(payload): AppJson<UpdateTopicRequest>,
) -> Result<Json<Topic>> {
    payload.validate()?;

    let topic = topic_service::update_topic(&state.db, &name, &payload).await?;
    Ok(Json(topic))
}

pub async fn delete_topic(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(name): Path<String>,
) -> Result<StatusCode> {
    topic_service::delete_topic(&state.db, &name).await?;
    tracing::info!(user_id = auth_user.user_id, topic = %name, "Topic deleted");

    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_topic_posts(
    State(state): State<AppState>,
    Path(name): Path<String>,
    auth_user: OptionalAuthUser,
) -> Result<Json<Vec<PostResponse>>> {
    topic_service::get_topic_by_name(&state.db, &name)
        .await?
        .ok_or_else(|| AppError::NotFound("Topic not found".to_string()))?;

    let posts = post_service::get_topic_posts(
        &state.db,
        state.votes.as_ref(),
        &name,
        auth_user.user_id(),
    )
    .await?;
    Ok(Json(posts))
}
