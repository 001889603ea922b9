use axum::{extract::State, response::Json};
use serde_json::{Value, json};
use validator::Validate;

use super::AppJson;
use crate::{
    AppState,
    auth::AuthUser,
    error::Result,
    models::{LoginRequest, LoginResponse},
    services::user_service,
};

pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    payload.validate()?;

    let user_id = user_service::find_or_create_user(&state.db, &payload.username).await?;
    let token = state.tokens.issue(user_id)?;

    tracing::info!(user_id, "User logged in");

    Ok(Json(LoginResponse { token }))
}

pub async fn me(auth_user: AuthUser) -> Json<Value> {
    Json(json!({
        "user_id": auth_user.user_id
    }))
}
