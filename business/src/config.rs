use std::time::Duration;

use chrono::{FixedOffset, Offset as _, Utc};
use log::info;
use procure_utils::version_info::Channel;
use serde::Deserialize;

/// Hours east of UTC used when no offset is configured (WIB, UTC+07:00).
const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BusinessConfig {
    /// Shared data endpoint, used for both reads and form posts.
    pub api_url: String,
    /// Per-request timeout. Ignored on wasm32 where the browser owns timeouts.
    pub request_timeout: Duration,
    /// Offset applied when rendering datetime columns.
    pub utc_offset_hours: i32,
}

/// Environment overrides, read with `serde_env`.
///
/// `PROCURE_API_URL`, `PROCURE_TIMEOUT_SECS` and `PROCURE_UTC_OFFSET_HOURS`.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    procure_api_url: Option<String>,
    #[serde(default)]
    procure_timeout_secs: Option<u64>,
    #[serde(default)]
    procure_utc_offset_hours: Option<i32>,
}

impl BusinessConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Display offset for datetime columns, falling back to UTC+07:00 when the
    /// configured hours are out of range.
    pub fn display_offset(&self) -> FixedOffset {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .or_else(|| FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600))
            .unwrap_or_else(|| Utc.fix())
    }

    /// Build a config from the process environment on top of the compile-time default.
    pub fn from_env() -> Result<Self, serde_env::Error> {
        Self::from_vars(std::env::vars())
    }

    /// Build a config from an explicit list of variables.
    pub fn from_vars<I, S>(vars: I) -> Result<Self, serde_env::Error>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let raw: RawConfig = serde_env::from_iter(vars)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Self::default();
        if let Some(url) = raw.procure_api_url.filter(|u| !u.trim().is_empty()) {
            info!("Using PROCURE_API_URL override: {url}");
            config.api_url = url;
        }
        if let Some(secs) = raw.procure_timeout_secs {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(hours) = raw.procure_utc_offset_hours {
            config.utc_offset_hours = hours;
        }
        config
    }
}

/// Endpoint compiled in for each release channel.
fn default_api_url(channel: Channel) -> &'static str {
    if cfg!(target_arch = "wasm32") {
        return "/api/requests";
    }
    match channel {
        Channel::Stable => "https://procure.example.com/api/requests",
        Channel::Nightly => "https://procure-nightly.example.com/api/requests",
        Channel::Internal => "https://procure-internal.example.com/api/requests",
        Channel::Test => "https://procure-test.example.com/api/requests",
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(Channel::current()).to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}
