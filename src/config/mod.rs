//! Typed configuration from environment variables.
//!
//! Loads once at startup, fails fast if a required or malformed var is found.
//! The database URL is wrapped in `secrecy::SecretString` to keep it out of logs.

use crate::error::{Error, Result};
use chrono::FixedOffset;
use secrecy::SecretString;
use std::time::Duration;

/// Work group projected when `WORK_GROUP` is unset.
pub const DEFAULT_WORK_GROUP: i64 = 12;

/// Poll cadence when `POLL_INTERVAL_SECS` is unset.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

#[derive(Debug)]
pub struct Config {
    /// Absent when the board runs against a file source.
    pub database_url: Option<SecretString>,
    pub work_group: i64,
    pub poll_interval: Duration,
    /// Wall-clock frame used to sample "now". `None` means the host's local zone.
    pub utc_offset: Option<FixedOffset>,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let poll_secs = match var("POLL_INTERVAL_SECS") {
            Some(raw) => parse_var::<u64>("POLL_INTERVAL_SECS", &raw)?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };
        if poll_secs == 0 {
            return Err(Error::Config(
                "POLL_INTERVAL_SECS must be at least 1".to_string(),
            ));
        }

        let utc_offset = match var("UTC_OFFSET_MINUTES") {
            Some(raw) => {
                let minutes = parse_var::<i32>("UTC_OFFSET_MINUTES", &raw)?;
                let offset = minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| {
                        Error::Config(format!("UTC_OFFSET_MINUTES out of range: {minutes}"))
                    })?;
                Some(offset)
            }
            None => None,
        };

        Ok(Self {
            database_url: var("DATABASE_URL").map(SecretString::from),
            work_group: match var("WORK_GROUP") {
                Some(raw) => parse_var("WORK_GROUP", &raw)?,
                None => DEFAULT_WORK_GROUP,
            },
            poll_interval: Duration::from_secs(poll_secs),
            utc_offset,
            otel_endpoint: var("OTEL_ENDPOINT"),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// The database URL, or a config error naming the missing variable.
    pub fn require_database_url(&self) -> Result<&SecretString> {
        self.database_url.as_ref().ok_or_else(|| {
            Error::Config("required environment variable DATABASE_URL is not set".to_string())
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid value for {name} ({raw:?}): {e}")))
}
