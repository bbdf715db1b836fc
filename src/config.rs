use std::env;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    // Reminders
    pub reminders_enabled: bool,
    pub reminder_interval_secs: u64,
    pub default_cycle_length: i32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .context("PORT must be a number")?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            reminders_enabled: env::var("REMINDERS_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            reminder_interval_secs: env::var("REMINDER_INTERVAL_SECS")
                .unwrap_or_else(|_| "86400".into()) // once a day
                .parse()
                .context("REMINDER_INTERVAL_SECS must be a number")?,
            default_cycle_length: env::var("DEFAULT_CYCLE_LENGTH")
                .unwrap_or_else(|_| "28".into())
                .parse()
                .context("DEFAULT_CYCLE_LENGTH must be a number")?,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
            frontend_url: "http://localhost:3000".into(),
            reminders_enabled: false,
            reminder_interval_secs: 86400,
            default_cycle_length: 28,
        }
    }
}
