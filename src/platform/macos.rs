#![allow(unsafe_code, reason = "AppKit accessors are unsafe in objc2-app-kit 0.2")]

use super::recency::RecencyLog;
use super::{AppLabels, CapabilityHost, UsageSource};
use crate::constants::DEFAULT_SAMPLE_WINDOW_MS;
use crate::error::HostError;
use crate::models::{ApplicationId, TimeWindow, UsageRecord};
use crate::sync::safe_lock;
use log::{info, warn};
use objc2_app_kit::NSWorkspace;
use std::collections::HashMap;
use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;

const ACCESSIBILITY_SETTINGS: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_Accessibility";

pub struct MacOSHost {
    log: Mutex<RecencyLog>,
    labels: Mutex<HashMap<ApplicationId, String>>,
}

impl Default for MacOSHost {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SAMPLE_WINDOW_MS))
    }
}

impl MacOSHost {
    pub fn new(sample_window: Duration) -> Self {
        Self {
            log: Mutex::new(RecencyLog::new(sample_window)),
            labels: Mutex::new(HashMap::new()),
        }
    }

    /// Bundle identifier and localized name of the frontmost application.
    fn frontmost() -> Option<(String, String)> {
        let (bundle_id, name) = unsafe {
            let workspace = NSWorkspace::sharedWorkspace();
            let app = workspace.frontmostApplication()?;
            let bundle_id = app.bundleIdentifier()?.to_string();
            let name = app.localizedName().map(|n| n.to_string());
            (bundle_id, name)
        };
        let name = name.unwrap_or_else(|| bundle_id.clone());
        Some((bundle_id, name))
    }

    fn observe(&self) -> Option<ApplicationId> {
        let (bundle_id, name) = Self::frontmost()?;
        let app = ApplicationId::parse(&bundle_id).ok()?;
        safe_lock(&self.labels, "Labels").insert(app.clone(), name);
        Some(app)
    }
}

impl UsageSource for MacOSHost {
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>, HostError> {
        let observed = self.observe();
        let mut log = safe_lock(&self.log, "Recency log");
        log.record(observed, window.end);
        Ok(log.records(window))
    }
}

impl CapabilityHost for MacOSHost {
    fn usage_access_check(&self) -> Option<bool> {
        // NSWorkspace needs no grant to report the frontmost application
        Some(true)
    }

    fn overlay_access(&self) -> bool {
        true
    }

    fn open_usage_settings(&self) {
        if let Err(e) = Command::new("open").arg(ACCESSIBILITY_SETTINGS).spawn() {
            warn!("Failed to open privacy settings: {e}");
        }
    }

    fn open_overlay_settings(&self) {
        info!("No overlay settings on macOS");
    }
}

impl AppLabels for MacOSHost {
    fn display_name(&self, app: &ApplicationId) -> Option<String> {
        safe_lock(&self.labels, "Labels").get(app).cloned()
    }
}
