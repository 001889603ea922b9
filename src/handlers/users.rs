use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::UserResponse,
    services::user_service,
};

pub async fn get_user(
    State(state): State<AppState>,
    Path(id_or_username): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = user_service::get_user_by_id_or_username(&state.db, &id_or_username)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
