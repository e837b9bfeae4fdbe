use crate::constants::USAGE_PROBE_WINDOW_SECS;
use crate::models::{Capability, TimeWindow};
use crate::platform::{CapabilityHost, UsageSource};
use log::{debug, info};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Boolean view of the two host capabilities the monitor depends on.
pub struct CapabilityGate {
    host: Arc<dyn CapabilityHost>,
    usage: Arc<dyn UsageSource>,
}

impl CapabilityGate {
    pub fn new(host: Arc<dyn CapabilityHost>, usage: Arc<dyn UsageSource>) -> Self {
        Self { host, usage }
    }

    /// Prefers the host's explicit check. Without one, a non-empty query over
    /// the last 24 hours counts as granted; an idle device reads as denied.
    pub fn has_usage_access(&self) -> bool {
        if let Some(granted) = self.host.usage_access_check() {
            debug!("Usage access (explicit check): {granted}");
            return granted;
        }

        let window = TimeWindow::trailing(
            SystemTime::now(),
            Duration::from_secs(USAGE_PROBE_WINDOW_SECS),
        );
        let granted = self
            .usage
            .query_usage(window)
            .map(|records| !records.is_empty())
            .unwrap_or(false);
        debug!("Usage access (inferred from 24h query): {granted}");
        granted
    }

    pub fn has_overlay_access(&self) -> bool {
        let granted = self.host.overlay_access();
        debug!("Overlay access: {granted}");
        granted
    }

    pub fn check(&self, capability: Capability) -> bool {
        match capability {
            Capability::UsageAccess => self.has_usage_access(),
            Capability::OverlayAccess => self.has_overlay_access(),
        }
    }

    /// First capability that is missing, usage access before overlay access.
    pub fn first_missing(&self) -> Option<Capability> {
        [Capability::UsageAccess, Capability::OverlayAccess]
            .into_iter()
            .find(|capability| !self.check(*capability))
    }

    /// Opens the host settings surface. Grant completion is not reported;
    /// callers re-query later.
    pub fn request_usage_access(&self) {
        info!("Requesting usage access");
        self.host.open_usage_settings();
    }

    pub fn request_overlay_access(&self) {
        info!("Requesting overlay access");
        self.host.open_overlay_settings();
    }
}
