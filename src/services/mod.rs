pub mod cycle;
pub mod reminders;
