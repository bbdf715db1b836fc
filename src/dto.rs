//! # CycleTrack — Request/Response DTOs
//!
//! API contract types for the JSON endpoints.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Field names are camelCase on the wire (`userId`, `cycleLength`)
//! - All validation is expressed via `validator` derive macros
//! - PATCH bodies reject unknown fields; `null` clears a nullable field
//! - Dates accept `YYYY-MM-DD` or an RFC 3339 timestamp (time-of-day dropped)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{calendar_day, nullable};
use crate::models::entry::{EntryChanges, Flow, NewEntry};
use crate::models::user::{NewUser, UserChanges};
use crate::services::cycle::CycleAnalysis;

const MAX_TAG_LEN: usize = 64;

fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    for tag in tags {
        let len = tag.trim().chars().count();
        if len == 0 || len > MAX_TAG_LEN {
            let mut err = ValidationError::new("tag_length");
            err.message = Some("Symptom tags must be 1-64 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter().map(|t| t.trim().to_string()).collect()
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Users
// ============================================================================

/// POST /api/users
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: String,

    /// Default: 28
    #[validate(range(min = 1, max = 90, message = "Cycle length must be 1-90 days"))]
    pub cycle_length: Option<i32>,

    /// Default: 5
    #[validate(range(min = 1, max = 30, message = "Period length must be 1-30 days"))]
    pub period_length: Option<i32>,

    #[serde(default, deserialize_with = "calendar_day::deserialize_option")]
    pub last_period: Option<NaiveDate>,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            cycle_length: req.cycle_length,
            period_length: req.period_length,
            last_period: req.last_period,
        }
    }
}

/// PATCH /api/users/{id} — partial update, all fields optional
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 64, message = "Username must be 1-64 characters"))]
    pub username: Option<String>,

    #[validate(length(min = 1, max = 128, message = "Password must be 1-128 characters"))]
    pub password: Option<String>,

    #[validate(range(min = 1, max = 90, message = "Cycle length must be 1-90 days"))]
    pub cycle_length: Option<i32>,

    #[validate(range(min = 1, max = 30, message = "Period length must be 1-30 days"))]
    pub period_length: Option<i32>,

    #[serde(default, deserialize_with = "calendar_day::deserialize_nullable")]
    pub last_period: Option<Option<NaiveDate>>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            cycle_length: req.cycle_length,
            period_length: req.period_length,
            last_period: req.last_period,
        }
    }
}

// ============================================================================
// Entries
// ============================================================================

/// POST /api/entries
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub user_id: i64,

    #[serde(deserialize_with = "calendar_day::deserialize")]
    pub date: NaiveDate,

    pub flow: Flow,

    /// Free-text tags. Mood goes in as `mood:<value>`.
    #[serde(default)]
    #[validate(
        length(max = 32, message = "At most 32 symptoms per entry"),
        custom = "validate_tags"
    )]
    pub symptoms: Vec<String>,

    #[validate(length(max = 5000, message = "Notes must be under 5000 characters"))]
    pub notes: Option<String>,
}

impl From<CreateEntryRequest> for NewEntry {
    fn from(req: CreateEntryRequest) -> Self {
        Self {
            user_id: req.user_id,
            date: req.date,
            flow: req.flow,
            symptoms: clean_tags(req.symptoms),
            notes: req.notes,
        }
    }
}

/// PATCH /api/entries/{id} — replaces any subset of fields
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateEntryRequest {
    #[serde(default, deserialize_with = "calendar_day::deserialize_option")]
    pub date: Option<NaiveDate>,

    pub flow: Option<Flow>,

    #[validate(
        length(max = 32, message = "At most 32 symptoms per entry"),
        custom = "validate_tags"
    )]
    pub symptoms: Option<Vec<String>>,

    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 5000, message = "Notes must be under 5000 characters"))]
    pub notes: Option<Option<String>>,
}

impl From<UpdateEntryRequest> for EntryChanges {
    fn from(req: UpdateEntryRequest) -> Self {
        Self {
            date: req.date,
            flow: req.flow,
            symptoms: req.symptoms.map(clean_tags),
            notes: req.notes,
        }
    }
}

// ============================================================================
// Insights
// ============================================================================

/// GET /api/users/{id}/insights query params
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsQuery {
    /// Day to evaluate the reminder against. Default: today (UTC).
    pub as_of: Option<NaiveDate>,
}

/// Reminder state for the `asOf` day, based on the profile cycle length
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStatus {
    pub cycle_length: i64,
    pub predicted_onset: Option<NaiveDate>,
    pub days_until: Option<i64>,
    pub due: bool,
}

/// GET /api/users/{id}/insights
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub user_id: i64,
    pub as_of: NaiveDate,
    #[serde(flatten)]
    pub analysis: CycleAnalysis,
    pub reminder: ReminderStatus,
}
