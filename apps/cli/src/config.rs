//! Environment-driven configuration.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono_tz::Tz;
use ticketsync_client::DEFAULT_TIMEOUT_SECS;

const TRACKER_URL: &str = "TICKETSYNC_TRACKER_URL";
const PROJECT_KEY: &str = "TICKETSYNC_PROJECT_KEY";
const TRACKER_TOKEN: &str = "TICKETSYNC_TRACKER_TOKEN";
const STORE_URL: &str = "TICKETSYNC_STORE_URL";
const STORE_TOKEN: &str = "TICKETSYNC_STORE_TOKEN";
const TIMEOUT_SECS: &str = "TICKETSYNC_TIMEOUT_SECS";
const TRACKER_TZ: &str = "TICKETSYNC_TRACKER_TZ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub tracker_url: String,
    pub project_key: String,
    pub tracker_token: Option<String>,
    pub store_url: String,
    pub store_token: Option<String>,
    pub timeout: Duration,
    /// IANA zone the tracker reads query dates in (the API user's profile zone).
    pub tracker_tz: Tz,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Values are trimmed; empty counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &str| get(name).with_context(|| format!("{} is not set", name));

        let tracker_url = require(TRACKER_URL)?.trim_end_matches('/').to_string();
        let project_key = require(PROJECT_KEY)?;
        validate_project_key(&project_key)?;
        let store_url = require(STORE_URL)?;

        let timeout_secs = match get(TIMEOUT_SECS) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .with_context(|| {
                    format!("{} must be a positive number of seconds, got '{}'", TIMEOUT_SECS, raw)
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let tracker_tz = match get(TRACKER_TZ) {
            Some(raw) => raw.parse::<Tz>().ok().with_context(|| {
                format!("{} must be an IANA timezone name, got '{}'", TRACKER_TZ, raw)
            })?,
            None => Tz::UTC,
        };

        Ok(Self {
            tracker_url,
            project_key,
            tracker_token: get(TRACKER_TOKEN),
            store_url,
            store_token: get(STORE_TOKEN),
            timeout: Duration::from_secs(timeout_secs),
            tracker_tz,
        })
    }
}

fn validate_project_key(key: &str) -> Result<()> {
    let mut chars = key.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    if !valid {
        bail!(
            "{} '{}' is invalid: expected an upper-case key like OPS or OPS_2",
            PROJECT_KEY,
            key
        );
    }
    Ok(())
}
