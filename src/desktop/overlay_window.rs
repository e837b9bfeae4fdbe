use crate::error::OverlayError;
use crate::overlay::{OverlayContent, OverlaySurface};
use log::{debug, warn};
use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

pub const OVERLAY_WINDOW: &str = "intervention";

/// Full-screen, undecorated, always-on-top webview serving `overlay.html`.
/// The page reads its copy from `window.__NUDGE_OVERLAY__`.
pub struct TauriOverlay {
    app: AppHandle,
}

impl TauriOverlay {
    pub fn new(app: AppHandle) -> Self {
        Self { app }
    }

    fn destroy_stale(&self) {
        if let Some(window) = self.app.get_webview_window(OVERLAY_WINDOW) {
            debug!("Destroying stale overlay window");
            if let Err(e) = window.destroy() {
                warn!("Failed to destroy stale overlay window: {e}");
            }
        }
    }
}

impl OverlaySurface for TauriOverlay {
    fn insert(&mut self, content: &OverlayContent) -> Result<(), OverlayError> {
        let payload = serde_json::to_string(content)
            .map_err(|e| OverlayError::InsertionFailed(e.to_string()))?;
        let script = format!("window.__NUDGE_OVERLAY__ = {payload};");

        self.destroy_stale();
        WebviewWindowBuilder::new(
            &self.app,
            OVERLAY_WINDOW,
            WebviewUrl::App("overlay.html".into()),
        )
        .title(content.title.as_str())
        .initialization_script(&script)
        .fullscreen(true)
        .decorations(false)
        .always_on_top(true)
        .skip_taskbar(true)
        .focused(false)
        .resizable(false)
        .visible(true)
        .build()
        .map(|_| ())
        .map_err(|e| OverlayError::InsertionFailed(e.to_string()))
    }

    fn remove(&mut self) -> Result<(), OverlayError> {
        match self.app.get_webview_window(OVERLAY_WINDOW) {
            Some(window) => window
                .close()
                .map_err(|e| OverlayError::RemovalFailed(e.to_string())),
            None => Ok(()),
        }
    }

    fn terminate(&mut self) {
        self.destroy_stale();
    }

    fn is_present(&self) -> bool {
        self.app.get_webview_window(OVERLAY_WINDOW).is_some()
    }
}
