//! Period reminders.
//!
//! [`should_notify`] is the pure trigger. The sweep and worker below feed it
//! every user's entries and pass anything that fires to a [`Notifier`].

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use crate::db::Store;
use crate::models::entry::PeriodEntry;

/// Reminders fire exactly this many days before the predicted onset.
pub const REMINDER_LEAD_DAYS: i64 = 2;

pub const REMINDER_TITLE: &str = "Period Reminder";

/// Fire-and-forget delivery surface. No delivery guarantee, no retry.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// Emits reminders as structured log events.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) {
        tracing::info!(title = %title, body = %body, "Reminder dispatched");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub title: String,
    pub body: String,
}

/// Most recent entry date + `cycle_length` days.
pub fn predicted_onset(entries: &[PeriodEntry], cycle_length: i64) -> Option<NaiveDate> {
    let last = entries.iter().map(|e| e.date).max()?;
    last.checked_add_signed(Duration::days(cycle_length))
}

/// True only on the single day that is exactly [`REMINDER_LEAD_DAYS`] before
/// the predicted onset. A day that is never checked never fires later.
pub fn should_notify(entries: &[PeriodEntry], current_date: NaiveDate, cycle_length: i64) -> bool {
    predicted_onset(entries, cycle_length)
        .map(|predicted| (predicted - current_date).num_days() == REMINDER_LEAD_DAYS)
        .unwrap_or(false)
}

pub fn reminder_message(predicted: NaiveDate) -> Reminder {
    Reminder {
        title: REMINDER_TITLE.to_string(),
        body: format!(
            "Your next period is expected to start on {}",
            predicted.format("%B %-d")
        ),
    }
}

/// Check every user once for `today`. Returns how many reminders were sent.
pub async fn run_reminder_sweep(store: &Store, notifier: &dyn Notifier, today: NaiveDate) -> usize {
    let mut sent = 0;

    for user in store.list_users().await {
        let entries = store.list_entries_by_owner(user.id).await;
        let cycle_length = i64::from(user.cycle_length);

        if !should_notify(&entries, today, cycle_length) {
            continue;
        }
        let Some(predicted) = predicted_onset(&entries, cycle_length) else {
            continue;
        };

        let reminder = reminder_message(predicted);
        notifier.notify(&reminder.title, &reminder.body);
        tracing::debug!(user_id = user.id, predicted = %predicted, "Reminder triggered");
        sent += 1;
    }

    sent
}

// ── Reminder Worker ──────────────────────────────────────────────────────────

pub fn spawn_reminder_worker(store: Store, notifier: Arc<dyn Notifier>, every: std::time::Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let today = Utc::now().date_naive();
            let sent = run_reminder_sweep(&store, notifier.as_ref(), today).await;
            if sent > 0 {
                tracing::info!(sent, %today, "Reminder sweep: notifications sent");
            }
        }
    });
}
