use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorState {
    /// No active ticker.
    #[default]
    Idle,
    /// Sampling on schedule.
    Running,
    /// Ticker stopped while an intervention is pending.
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayState {
    #[default]
    Hidden,
    Visible,
}

/// Host-mediated permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    UsageAccess,
    OverlayAccess,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::UsageAccess => f.write_str("usage access"),
            Capability::OverlayAccess => f.write_str("overlay access"),
        }
    }
}

/// Reply to `start_monitoring`, serialised with the strings collaborators expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartOutcome {
    MonitoringStarted,
    PermissionRequired,
    OverlayPermissionRequired,
}

impl StartOutcome {
    pub fn denied(capability: Capability) -> Self {
        match capability {
            Capability::UsageAccess => StartOutcome::PermissionRequired,
            Capability::OverlayAccess => StartOutcome::OverlayPermissionRequired,
        }
    }
}

/// Acknowledgement of `stop_monitoring`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopAck {
    Stopped,
}
