//! The intervention overlay: a single, always-on-top modal with two actions.

use crate::capability::CapabilityGate;
use crate::error::OverlayError;
use crate::models::OverlayState;
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;

pub const OVERLAY_TITLE: &str = "A Mindful Pause";
pub const REDIRECT_LABEL: &str = "Learn Something New";
pub const DISMISS_LABEL: &str = "Continue to app anyway";

/// What the overlay is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayContext {
    pub app_display_name: String,
    pub today_usage_minutes: Option<u64>,
}

/// Rendered copy handed to the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayContent {
    pub title: String,
    pub message: String,
    pub usage_line: Option<String>,
    pub redirect_label: String,
    pub dismiss_label: String,
}

impl OverlayContent {
    pub fn render(context: &OverlayContext) -> Self {
        let app = &context.app_display_name;
        let usage_line = context
            .today_usage_minutes
            .filter(|minutes| *minutes > 0)
            .map(|minutes| format!("You've spent {minutes} min in {app} today."));

        Self {
            title: OVERLAY_TITLE.to_string(),
            message: format!("You've opened {app}. Choose a better reward."),
            usage_line,
            redirect_label: REDIRECT_LABEL.to_string(),
            dismiss_label: DISMISS_LABEL.to_string(),
        }
    }
}

/// Host window placement for the overlay.
pub trait OverlaySurface: Send {
    /// Place a full-screen, always-on-top surface showing `content`.
    fn insert(&mut self, content: &OverlayContent) -> Result<(), OverlayError>;
    fn remove(&mut self) -> Result<(), OverlayError>;
    /// Tear down the hosting context. Called after every hide.
    fn terminate(&mut self);
    /// Whether the inserted surface still exists. The user or the window
    /// manager may close it without going through the overlay.
    fn is_present(&self) -> bool;
}

/// Where "redirect" sends the user.
pub trait Navigator: Send + Sync {
    fn open_break_surface(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    Shown,
    /// Already visible; nothing was rendered.
    AlreadyVisible,
    /// Overlay access is not granted; nothing was rendered.
    AccessDenied,
    /// The host refused the surface. Logged, state stays hidden.
    InsertionFailed,
}

pub struct InterventionOverlay {
    state: OverlayState,
    gate: Arc<CapabilityGate>,
    surface: Box<dyn OverlaySurface>,
    navigator: Arc<dyn Navigator>,
}

impl InterventionOverlay {
    pub fn new(
        gate: Arc<CapabilityGate>,
        surface: Box<dyn OverlaySurface>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            state: OverlayState::Hidden,
            gate,
            surface,
            navigator,
        }
    }

    /// Current state, after accounting for a surface closed behind our back.
    pub fn state(&mut self) -> OverlayState {
        self.reconcile();
        self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state == OverlayState::Visible
    }

    /// Show the overlay unless one is already up. Failures stay local: they
    /// are logged and the overlay remains hidden.
    pub fn show(&mut self, context: &OverlayContext) -> ShowOutcome {
        self.reconcile();
        if self.is_visible() {
            return ShowOutcome::AlreadyVisible;
        }

        if !self.gate.has_overlay_access() {
            warn!("Overlay access not granted, skipping intervention");
            return ShowOutcome::AccessDenied;
        }

        let content = OverlayContent::render(context);
        match self.surface.insert(&content) {
            Ok(()) => {
                info!("Showing intervention for {}", context.app_display_name);
                self.state = OverlayState::Visible;
                ShowOutcome::Shown
            }
            Err(e) => {
                error!("Failed to show intervention overlay: {e}");
                ShowOutcome::InsertionFailed
            }
        }
    }

    /// "Learn something new": open the break surface, then hide. Returns
    /// whether the overlay was visible.
    pub fn redirect(&mut self) -> bool {
        let was_visible = self.is_visible();
        if was_visible {
            info!("Redirecting from intervention");
            self.navigator.open_break_surface();
        }
        self.hide();
        was_visible
    }

    /// "Continue anyway".
    pub fn dismiss(&mut self) -> bool {
        let was_visible = self.is_visible();
        if was_visible {
            info!("Intervention dismissed");
        }
        self.hide();
        was_visible
    }

    fn reconcile(&mut self) {
        if self.is_visible() && !self.surface.is_present() {
            warn!("Intervention overlay was closed outside its actions");
            self.state = OverlayState::Hidden;
            self.surface.terminate();
        }
    }

    /// Idempotent. The hosting context is terminated every time.
    pub fn hide(&mut self) {
        if self.is_visible() {
            if let Err(e) = self.surface.remove() {
                warn!("Failed to remove intervention overlay: {e}");
            }
            self.state = OverlayState::Hidden;
        }
        self.surface.terminate();
    }
}
