use crate::constants::SECS_PER_DAY;
use crate::error::AppError;
use crate::validation::validate_app_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Stable key of an installed application (package, bundle or window class).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        validate_app_id(raw)?;
        Ok(Self(raw.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One application's activity as reported by the host for a queried window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    pub app_id: ApplicationId,
    pub last_active: SystemTime,
    pub foreground_total: Duration,
}

impl UsageRecord {
    pub fn new(app_id: ApplicationId, last_active: SystemTime, foreground_total: Duration) -> Self {
        Self {
            app_id,
            last_active,
            foreground_total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: SystemTime,
    pub end: SystemTime,
}

impl TimeWindow {
    /// `[now - length, now]`, clamped at the epoch.
    pub fn trailing(now: SystemTime, length: Duration) -> Self {
        let start = now
            .checked_sub(length)
            .map_or(UNIX_EPOCH, |start| start.max(UNIX_EPOCH));
        Self { start, end: now }
    }

    /// From UTC midnight of `now`'s day up to `now`.
    pub fn today(now: SystemTime) -> Self {
        let since_epoch = now
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs();
        let midnight = UNIX_EPOCH + Duration::from_secs(since_epoch - since_epoch % SECS_PER_DAY);
        Self {
            start: midnight,
            end: now,
        }
    }

    pub fn contains(&self, at: SystemTime) -> bool {
        at >= self.start && at <= self.end
    }
}

/// Outcome of one foreground sample. `None` is indistinguishable from a
/// briefly idle device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleResult {
    Identifier(ApplicationId),
    None,
}

impl From<Option<ApplicationId>> for SampleResult {
    fn from(value: Option<ApplicationId>) -> Self {
        value.map_or(SampleResult::None, SampleResult::Identifier)
    }
}
