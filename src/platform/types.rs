use crate::error::HostError;
use crate::models::{ApplicationId, TimeWindow, UsageRecord};

/// Host facility reporting per-application activity by recency.
pub trait UsageSource: Send + Sync {
    /// Applications active inside `window`. May be empty; denial may also
    /// surface as an empty result rather than an error.
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>, HostError>;
}

pub trait CapabilityHost: Send + Sync {
    /// Explicit usage-access check, when the platform offers one.
    fn usage_access_check(&self) -> Option<bool>;
    fn overlay_access(&self) -> bool;
    fn open_usage_settings(&self);
    fn open_overlay_settings(&self);
}

pub trait AppLabels: Send + Sync {
    fn display_name(&self, app: &ApplicationId) -> Option<String>;
}
