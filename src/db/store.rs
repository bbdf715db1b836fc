use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::entry::{EntryChanges, NewEntry, PeriodEntry};
use crate::models::user::{
    NewUser, User, UserChanges, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH,
};

/// In-memory store for users and period entries.
///
/// Cloning is cheap and every clone shares the same tables. Each call takes
/// the lock exactly once, so a create or update is never interleaved with
/// another one.
#[derive(Clone, Default)]
pub struct Store {
    tables: Arc<Mutex<Tables>>,
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    entries: BTreeMap<i64, PeriodEntry>,
    last_user_id: i64,
    last_entry_id: i64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Users ───────────────────────────────────────────────────────────

    pub async fn create_user(&self, new: NewUser) -> AppResult<User> {
        let mut tables = self.tables.lock().await;

        if tables.users.values().any(|u| u.username == new.username) {
            return Err(AppError::Conflict("Username already taken".into()));
        }

        tables.last_user_id += 1;
        let user = User {
            id: tables.last_user_id,
            username: new.username,
            password: new.password,
            cycle_length: new.cycle_length.unwrap_or(DEFAULT_CYCLE_LENGTH),
            period_length: new.period_length.unwrap_or(DEFAULT_PERIOD_LENGTH),
            last_period: new.last_period,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub async fn get_user(&self, id: i64) -> Option<User> {
        self.tables.lock().await.users.get(&id).cloned()
    }

    pub async fn find_user_by_username(&self, username: &str) -> Option<User> {
        self.tables
            .lock()
            .await
            .users
            .values()
            .find(|u| u.username == username)
            .cloned()
    }

    pub async fn list_users(&self) -> Vec<User> {
        self.tables.lock().await.users.values().cloned().collect()
    }

    pub async fn update_user(&self, id: i64, changes: UserChanges) -> AppResult<User> {
        let mut tables = self.tables.lock().await;

        if !tables.users.contains_key(&id) {
            return Err(AppError::NotFound("User not found".into()));
        }
        if let Some(username) = changes.username.as_deref() {
            let taken = tables
                .users
                .values()
                .any(|u| u.id != id && u.username == username);
            if taken {
                return Err(AppError::Conflict("Username already taken".into()));
            }
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        user.apply(changes);
        Ok(user.clone())
    }

    // ── Entries ─────────────────────────────────────────────────────────

    pub async fn create_entry(&self, new: NewEntry) -> PeriodEntry {
        let mut tables = self.tables.lock().await;

        tables.last_entry_id += 1;
        let entry = PeriodEntry {
            id: tables.last_entry_id,
            user_id: new.user_id,
            date: new.date,
            flow: new.flow,
            symptoms: new.symptoms,
            notes: new.notes,
        };
        tables.entries.insert(entry.id, entry.clone());
        entry
    }

    pub async fn get_entry(&self, id: i64) -> Option<PeriodEntry> {
        self.tables.lock().await.entries.get(&id).cloned()
    }

    /// Entries owned by `user_id`, in id order. Callers sort by date when
    /// they need chronological order.
    pub async fn list_entries_by_owner(&self, user_id: i64) -> Vec<PeriodEntry> {
        self.tables
            .lock()
            .await
            .entries
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn update_entry(&self, id: i64, changes: EntryChanges) -> AppResult<PeriodEntry> {
        let mut tables = self.tables.lock().await;
        let entry = tables
            .entries
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Entry not found".into()))?;
        entry.apply(changes);
        Ok(entry.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::Flow;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_entry(user_id: i64, date: NaiveDate) -> NewEntry {
        NewEntry {
            user_id,
            date,
            flow: Flow::Medium,
            symptoms: vec!["Cramps".into()],
            notes: Some("first day".into()),
        }
    }

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password: "secret".into(),
            cycle_length: None,
            period_length: None,
            last_period: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let store = Store::new();
        let created = store.create_entry(new_entry(1, day(2024, 1, 1))).await;
        let fetched = store.get_entry(created.id).await.expect("entry exists");

        assert_eq!(fetched, created);
        assert_eq!(fetched.user_id, 1);
        assert_eq!(fetched.date, day(2024, 1, 1));
        assert_eq!(fetched.flow, Flow::Medium);
        assert_eq!(fetched.symptoms, vec!["Cramps".to_string()]);
        assert_eq!(fetched.notes.as_deref(), Some("first day"));
    }

    #[tokio::test]
    async fn test_ids_are_monotonic_and_start_at_one() {
        let store = Store::new();
        let a = store.create_entry(new_entry(1, day(2024, 1, 1))).await;
        let b = store.create_entry(new_entry(2, day(2024, 1, 2))).await;
        let c = store.create_entry(new_entry(1, day(2024, 1, 3))).await;
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let u = store.create_user(new_user("ada")).await.unwrap();
        assert_eq!(u.id, 1, "users have their own id sequence");
    }

    #[tokio::test]
    async fn test_list_filters_by_owner() {
        let store = Store::new();
        store.create_entry(new_entry(1, day(2024, 2, 1))).await;
        store.create_entry(new_entry(2, day(2024, 1, 15))).await;
        store.create_entry(new_entry(1, day(2024, 1, 1))).await;

        let mine = store.list_entries_by_owner(1).await;
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|e| e.user_id == 1));
        assert!(store.list_entries_by_owner(99).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_entry_is_not_found_and_store_unchanged() {
        let store = Store::new();
        let existing = store.create_entry(new_entry(1, day(2024, 1, 1))).await;

        let result = store
            .update_entry(
                42,
                EntryChanges {
                    flow: Some(Flow::Heavy),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(store.get_entry(42).await.is_none());
        assert_eq!(store.get_entry(existing.id).await.unwrap(), existing);
    }

    #[tokio::test]
    async fn test_update_entry_merges_fields() {
        let store = Store::new();
        let created = store.create_entry(new_entry(1, day(2024, 1, 1))).await;

        let updated = store
            .update_entry(
                created.id,
                EntryChanges {
                    flow: Some(Flow::Heavy),
                    notes: Some(Some("worse".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.flow, Flow::Heavy);
        assert_eq!(updated.notes.as_deref(), Some("worse"));
        assert_eq!(updated.date, created.date);
        assert_eq!(store.get_entry(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_create_user_applies_defaults() {
        let store = Store::new();
        let u = store.create_user(new_user("ada")).await.unwrap();
        assert_eq!(u.cycle_length, DEFAULT_CYCLE_LENGTH);
        assert_eq!(u.period_length, DEFAULT_PERIOD_LENGTH);
        assert_eq!(u.last_period, None);
        assert_eq!(store.find_user_by_username("ada").await, Some(u));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = Store::new();
        store.create_user(new_user("ada")).await.unwrap();
        let dup = store.create_user(new_user("ada")).await;
        assert!(matches!(dup, Err(AppError::Conflict(_))));
        assert_eq!(store.list_users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_rename_onto_taken_username_conflicts() {
        let store = Store::new();
        store.create_user(new_user("ada")).await.unwrap();
        let grace = store.create_user(new_user("grace")).await.unwrap();

        let result = store
            .update_user(
                grace.id,
                UserChanges {
                    username: Some("ada".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        // Renaming to your own name is fine
        let same = store
            .update_user(
                grace.id,
                UserChanges {
                    username: Some("grace".into()),
                    cycle_length: Some(30),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(same.cycle_length, 30);
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let store = Store::new();
        let result = store.update_user(3, UserChanges::default()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let store = Store::new();
        let other = store.clone();
        let e = store.create_entry(new_entry(1, day(2024, 1, 1))).await;
        assert_eq!(other.get_entry(e.id).await, Some(e));
    }
}
