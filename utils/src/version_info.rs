//! Version information, populated at build time by `build.rs`.
//!
//! Display format depends on the release channel selected by cargo features:
//! - Stable: `stable:{version}`
//! - Nightly: `nightly:{date}`
//! - Internal: `internal:{commit}`
//! - Test: `test:{commit}`

use std::fmt;

/// Release channel the binary was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Stable,
    Nightly,
    Internal,
    Test,
}

impl Channel {
    /// Channel selected by the `env_*` features of this crate.
    pub fn current() -> Self {
        if cfg!(feature = "env_nightly") {
            Self::Nightly
        } else if cfg!(feature = "env_internal") {
            Self::Internal
        } else if cfg!(feature = "env_test") {
            Self::Test
        } else {
            Self::Stable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Nightly => "nightly",
            Self::Internal => "internal",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build date in RFC3339 format.
pub fn build_date() -> &'static str {
    env!("BUILD_DATE")
}

/// Short git commit hash, or `unknown` outside a checkout.
pub fn build_commit() -> &'static str {
    env!("BUILD_COMMIT")
}

/// Cargo profile the crate was compiled with (`debug` / `release`).
pub fn build_profile() -> &'static str {
    env!("BUILD_PROFILE")
}

/// Package version.
pub fn build_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Short `{channel}:{info}` label for the given channel.
pub fn format_channel_version(channel: Channel) -> String {
    match channel {
        Channel::Stable => format!("stable:{}", build_version()),
        Channel::Nightly => {
            // BUILD_DATE is RFC3339, the first 10 bytes are the calendar date
            let date = build_date();
            let day = date.get(..10).unwrap_or(date);
            format!("nightly:{day}")
        }
        Channel::Internal => format!("internal:{}", build_commit()),
        Channel::Test => format!("test:{}", build_commit()),
    }
}

/// Label for the channel this binary was built for.
pub fn format_env_version() -> String {
    format_channel_version(Channel::current())
}
