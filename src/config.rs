use std::env;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use dotenvy::dotenv;

use crate::scheduler::Schedule;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    /// `None` keeps records in process memory only.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub api_prefix: String,

    // Attendance rules
    pub min_confidence: f64,
    pub use_utc: bool,

    // Daily reset
    pub reset_at: NaiveTime,
    pub reset_interval: Option<Duration>,

    // Rate limiting, 0 disables
    pub rate_mark_per_min: u32,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, applying defaults for absent keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let min_confidence: f64 = var("MIN_CONFIDENCE", "0.8")
            .parse()
            .context("MIN_CONFIDENCE must be a number")?;
        if !(0.0..=1.0).contains(&min_confidence) {
            bail!("MIN_CONFIDENCE must be between 0 and 1, got {min_confidence}");
        }

        let reset_at = NaiveTime::parse_from_str(&var("RESET_AT", "00:00"), "%H:%M")
            .context("RESET_AT must be formatted as HH:MM")?;

        let reset_interval = match lookup("RESET_INTERVAL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .context("RESET_INTERVAL_SECS must be a whole number of seconds")?;
                if secs == 0 {
                    bail!("RESET_INTERVAL_SECS must be greater than 0");
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            server_addr: var("SERVER_ADDR", "127.0.0.1:5000"),
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            db_max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            api_prefix: var("API_PREFIX", ""),

            min_confidence,
            use_utc: parse_bool(&var("ATTENDANCE_UTC", "true"))
                .context("ATTENDANCE_UTC must be true or false")?,

            reset_at,
            reset_interval,

            rate_mark_per_min: var("RATE_MARK_PER_MIN", "60")
                .parse()
                .context("RATE_MARK_PER_MIN must be a non-negative integer")?,

            log_dir: var("LOG_DIR", "logs"),
            log_level: var("LOG_LEVEL", "info")
                .parse()
                .context("LOG_LEVEL must be one of trace, debug, info, warn, error")?,
        })
    }

    /// When the daily reset runs. A configured interval overrides the time of day.
    pub fn reset_schedule(&self) -> Schedule {
        match self.reset_interval {
            Some(every) => Schedule::Every(every),
            None => Schedule::DailyAt(self.reset_at),
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("unrecognised boolean {other:?}"),
    }
}
