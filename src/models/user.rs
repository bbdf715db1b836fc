use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CYCLE_LENGTH: i32 = 28;
pub const DEFAULT_PERIOD_LENGTH: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Stored exactly as submitted; never serialized.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub cycle_length: i32,
    pub period_length: i32,
    pub last_period: Option<NaiveDate>,
}

impl User {
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(password) = changes.password {
            self.password = password;
        }
        if let Some(cycle_length) = changes.cycle_length {
            self.cycle_length = cycle_length;
        }
        if let Some(period_length) = changes.period_length {
            self.period_length = period_length;
        }
        if let Some(last_period) = changes.last_period {
            self.last_period = last_period;
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub cycle_length: Option<i32>,
    pub period_length: Option<i32>,
    pub last_period: Option<NaiveDate>,
}

/// `last_period: Some(None)` clears the stored date.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password: Option<String>,
    pub cycle_length: Option<i32>,
    pub period_length: Option<i32>,
    pub last_period: Option<Option<NaiveDate>>,
}

/// Minimal identity returned by signup and login.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
        }
    }
}
