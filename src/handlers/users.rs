use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{CreateUserRequest, UpdateUserRequest};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::models::user::{User, UserSummary};
use crate::AppState;

pub async fn create_user(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateUserRequest>,
) -> AppResult<Json<UserSummary>> {
    body.validate()?;

    let user = state.store.create_user(body.into()).await?;
    tracing::info!(user_id = user.id, "User signed up");

    Ok(Json(UserSummary::from(&user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> AppResult<Json<User>> {
    let user = state
        .store
        .get_user(user_id)
        .await
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
    AppJson(body): AppJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    body.validate()?;

    let user = state.store.update_user(user_id, body.into()).await?;
    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(user))
}
