use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::dto::LoginRequest;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::user::UserSummary;
use crate::AppState;

/// Plaintext credential comparison. No token is issued, and any mismatch,
/// blank fields included, is a 401.
pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<UserSummary>> {
    let user = state
        .store
        .find_user_by_username(&body.username)
        .await
        .ok_or(AppError::Unauthorized)?;

    if !user.password_matches(&body.password) {
        tracing::warn!(user_id = user.id, "Login rejected: password mismatch");
        return Err(AppError::Unauthorized);
    }

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(UserSummary::from(&user)))
}

pub async fn check() -> Json<Value> {
    Json(json!({ "authenticated": true }))
}
