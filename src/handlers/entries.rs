use axum::{extract::State, Json};
use validator::Validate;

use crate::dto::{CreateEntryRequest, UpdateEntryRequest};
use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::models::entry::PeriodEntry;
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateEntryRequest>,
) -> AppResult<Json<PeriodEntry>> {
    body.validate()?;

    let entry = state.store.create_entry(body.into()).await;
    tracing::info!(
        entry_id = entry.id,
        user_id = entry.user_id,
        date = %entry.date,
        "Period entry logged"
    );

    Ok(Json(entry))
}

pub async fn get_entry(
    State(state): State<AppState>,
    AppPath(entry_id): AppPath<i64>,
) -> AppResult<Json<PeriodEntry>> {
    let entry = state
        .store
        .get_entry(entry_id)
        .await
        .ok_or(AppError::NotFound("Entry not found".into()))?;

    Ok(Json(entry))
}

pub async fn update_entry(
    State(state): State<AppState>,
    AppPath(entry_id): AppPath<i64>,
    AppJson(body): AppJson<UpdateEntryRequest>,
) -> AppResult<Json<PeriodEntry>> {
    body.validate()?;

    let entry = state.store.update_entry(entry_id, body.into()).await?;
    tracing::debug!(entry_id = entry.id, "Period entry updated");

    Ok(Json(entry))
}

/// Entries in id order; clients sort by date themselves.
pub async fn list_user_entries(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
) -> AppResult<Json<Vec<PeriodEntry>>> {
    let entries = state.store.list_entries_by_owner(user_id).await;
    Ok(Json(entries))
}
