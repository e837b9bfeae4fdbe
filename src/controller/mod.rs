//! Control surface used by the configuration UI, and the wiring between the
//! monitor, the overlay and the outbound events.

use crate::capability::CapabilityGate;
use crate::config::AppConfig;
use crate::constants::FALLBACK_APP_LABEL;
use crate::error::AppError;
use crate::events::{EventSink, MonitorEvent};
use crate::models::{ApplicationId, MonitorState, OverlayState, StartOutcome, StopAck};
use crate::monitor::{CancelToken, Monitor, MonitorHooks, WatchList};
use crate::overlay::{InterventionOverlay, Navigator, OverlayContext, OverlaySurface};
use crate::platform::{AppLabels, CapabilityHost, UsageSource};
use crate::sampler::ForegroundSampler;
use crate::sync::safe_lock;
use log::debug;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

pub type SharedOverlay = Arc<Mutex<InterventionOverlay>>;

/// Everything the controller needs from the host environment.
pub struct HostServices {
    pub usage: Arc<dyn UsageSource>,
    pub capabilities: Arc<dyn CapabilityHost>,
    pub labels: Arc<dyn AppLabels>,
    pub surface: Box<dyn OverlaySurface>,
    pub navigator: Arc<dyn Navigator>,
    pub events: Arc<dyn EventSink>,
}

/// Turns monitor detections into outbound events and overlay requests.
struct Dispatcher {
    events: Arc<dyn EventSink>,
    overlay: SharedOverlay,
    labels: Arc<dyn AppLabels>,
    sampler: Arc<ForegroundSampler>,
    show_usage_total: bool,
}

impl Dispatcher {
    fn context_for(&self, app: &ApplicationId) -> OverlayContext {
        let app_display_name = self
            .labels
            .display_name(app)
            .unwrap_or_else(|| FALLBACK_APP_LABEL.to_string());
        let today_usage_minutes = self
            .show_usage_total
            .then(|| self.sampler.usage_today(app, SystemTime::now()))
            .flatten()
            .map(|total| total.as_secs() / 60);

        OverlayContext {
            app_display_name,
            today_usage_minutes,
        }
    }
}

impl MonitorHooks for Dispatcher {
    fn on_foreground_change(&self, app: Option<&ApplicationId>) {
        self.events
            .emit(&MonitorEvent::ForegroundAppUpdate(app.cloned()));
    }

    /// Runs under the overlay lock, which start and stop also take, so a
    /// stop that returned first always suppresses the event and the overlay.
    fn on_distraction(&self, app: &ApplicationId, cancel: &CancelToken) {
        let mut overlay = safe_lock(&self.overlay, "Overlay");
        if cancel.is_cancelled() {
            debug!("Monitoring stopped before {app} was dispatched");
            return;
        }

        self.events.emit(&MonitorEvent::Distraction(app.clone()));
        let context = self.context_for(app);
        let outcome = overlay.show(&context);
        debug!("Intervention for {app}: {outcome:?}");
    }
}

pub struct Controller {
    gate: Arc<CapabilityGate>,
    monitor: Monitor,
    overlay: SharedOverlay,
}

impl Controller {
    pub fn new(config: &AppConfig, host: HostServices) -> Self {
        let HostServices {
            usage,
            capabilities,
            labels,
            surface,
            navigator,
            events,
        } = host;

        let gate = Arc::new(CapabilityGate::new(capabilities, Arc::clone(&usage)));
        let sampler = Arc::new(ForegroundSampler::new(usage));
        let overlay = Arc::new(Mutex::new(InterventionOverlay::new(
            Arc::clone(&gate),
            surface,
            navigator,
        )));

        let dispatcher = Arc::new(Dispatcher {
            events,
            overlay: Arc::clone(&overlay),
            labels,
            sampler: Arc::clone(&sampler),
            show_usage_total: config.show_usage_total,
        });
        let monitor = Monitor::new(config.monitor(), Arc::clone(&gate), sampler, dispatcher);

        Self {
            gate,
            monitor,
            overlay,
        }
    }

    /// Replace the watch-list and (re)start monitoring. Missing capabilities
    /// are reported through the outcome, malformed identifiers as an error.
    pub fn start_monitoring<S: AsRef<str>>(&self, ids: &[S]) -> Result<StartOutcome, AppError> {
        let watch_list = WatchList::from_ids(ids)?;
        let _overlay = safe_lock(&self.overlay, "Overlay");
        match self.monitor.start(watch_list) {
            Ok(()) => Ok(StartOutcome::MonitoringStarted),
            Err(AppError::CapabilityDenied { capability }) => Ok(StartOutcome::denied(capability)),
            Err(e) => Err(e),
        }
    }

    pub fn stop_monitoring(&self) -> StopAck {
        let _overlay = safe_lock(&self.overlay, "Overlay");
        self.monitor.stop();
        StopAck::Stopped
    }

    pub fn check_overlay_permission(&self) -> bool {
        self.gate.has_overlay_access()
    }

    pub fn request_overlay_permission(&self) {
        self.gate.request_overlay_access();
    }

    pub fn check_usage_permission(&self) -> bool {
        self.gate.has_usage_access()
    }

    pub fn request_usage_permission(&self) {
        self.gate.request_usage_access();
    }

    /// Overlay "redirect" action. Monitoring stays suspended.
    pub fn redirect_from_overlay(&self) -> bool {
        safe_lock(&self.overlay, "Overlay").redirect()
    }

    /// Overlay "continue anyway" action. Monitoring stays suspended.
    pub fn dismiss_overlay(&self) -> bool {
        safe_lock(&self.overlay, "Overlay").dismiss()
    }

    pub fn monitor_state(&self) -> MonitorState {
        self.monitor.state()
    }

    pub fn overlay_state(&self) -> OverlayState {
        safe_lock(&self.overlay, "Overlay").state()
    }

    pub fn watch_list(&self) -> WatchList {
        self.monitor.watch_list()
    }

    /// Stop monitoring, wait for the ticker and take the overlay down. The
    /// overlay lock is not held while joining, the ticker may need it.
    pub fn shutdown(&self) {
        self.monitor.shutdown();
        safe_lock(&self.overlay, "Overlay").hide();
    }
}
