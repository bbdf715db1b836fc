use axum::{extract::State, Json};
use chrono::Utc;

use crate::dto::{InsightsQuery, InsightsResponse, ReminderStatus};
use crate::error::AppResult;
use crate::extract::{AppPath, AppQuery};
use crate::services::{cycle, reminders};
use crate::AppState;

/// Cycle statistics plus the reminder state for the `asOf` day.
///
/// Entries are not tied to a user record, so an unknown user still gets an
/// answer; the reminder then uses the configured default cycle length.
pub async fn get_insights(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<i64>,
    AppQuery(query): AppQuery<InsightsQuery>,
) -> AppResult<Json<InsightsResponse>> {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let entries = state.store.list_entries_by_owner(user_id).await;

    let cycle_length = match state.store.get_user(user_id).await {
        Some(user) => i64::from(user.cycle_length),
        None => i64::from(state.config.default_cycle_length),
    };

    let predicted_onset = reminders::predicted_onset(&entries, cycle_length);
    let reminder = ReminderStatus {
        cycle_length,
        predicted_onset,
        days_until: predicted_onset.map(|p| (p - as_of).num_days()),
        due: reminders::should_notify(&entries, as_of, cycle_length),
    };

    Ok(Json(InsightsResponse {
        user_id,
        as_of,
        analysis: cycle::analyze(&entries),
        reminder,
    }))
}
