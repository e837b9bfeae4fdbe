// src/commands.rs
//
// Tauri IPC handlers: the control surface exposed to the configuration UI.
// Handlers that take the overlay lock run off the main thread, since the
// lock holder may be waiting on the main event loop to build or close the
// overlay window. Starting and stopping take it too.

use crate::controller::Controller;
use crate::models::{MonitorState, OverlayState, StartOutcome, StopAck};
use serde::Serialize;
use std::sync::Arc;
use tauri::State;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorStateResponse {
    pub monitor: MonitorState,
    pub overlay: OverlayState,
    pub watched_apps: Vec<String>,
}

#[tauri::command(async)]
pub fn start_monitoring(
    controller: State<Arc<Controller>>,
    apps_to_monitor: Vec<String>,
) -> Result<StartOutcome, String> {
    controller.start_monitoring(&apps_to_monitor).map_err(|e| {
        log::error!("Failed to start monitoring: {e}");
        e.to_string()
    })
}

#[tauri::command(async)]
pub fn stop_monitoring(controller: State<Arc<Controller>>) -> StopAck {
    controller.stop_monitoring()
}

#[tauri::command]
pub fn check_overlay_permission(controller: State<Arc<Controller>>) -> bool {
    controller.check_overlay_permission()
}

#[tauri::command]
pub fn request_overlay_permission(controller: State<Arc<Controller>>) {
    controller.request_overlay_permission();
}

#[tauri::command]
pub fn check_usage_permission(controller: State<Arc<Controller>>) -> bool {
    controller.check_usage_permission()
}

#[tauri::command]
pub fn request_usage_permission(controller: State<Arc<Controller>>) {
    controller.request_usage_permission();
}

#[tauri::command(async)]
pub fn overlay_redirect(controller: State<Arc<Controller>>) -> bool {
    controller.redirect_from_overlay()
}

#[tauri::command(async)]
pub fn overlay_dismiss(controller: State<Arc<Controller>>) -> bool {
    controller.dismiss_overlay()
}

#[tauri::command(async)]
pub fn get_monitor_state(controller: State<Arc<Controller>>) -> MonitorStateResponse {
    MonitorStateResponse {
        monitor: controller.monitor_state(),
        overlay: controller.overlay_state(),
        watched_apps: controller
            .watch_list()
            .iter()
            .map(ToString::to_string)
            .collect(),
    }
}
