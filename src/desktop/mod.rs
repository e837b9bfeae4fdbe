//! Tauri shell: binds the controller to webview windows, the tray and the
//! IPC event bus.

mod overlay_window;

use crate::commands;
use crate::config::AppConfig;
use crate::controller::{Controller, HostServices};
use crate::events::{EventSink, MonitorEvent};
use crate::models::ApplicationId;
use crate::overlay::Navigator;
use crate::platform::NativeHost;
use log::{error, info, warn};
use overlay_window::TauriOverlay;
use std::sync::Arc;
use std::thread;
use tauri::{
    menu::{Menu, MenuItem},
    tray::TrayIconBuilder,
    AppHandle, Emitter, Manager, RunEvent, WebviewUrl, WebviewWindowBuilder, WindowEvent,
};

pub const MAIN_WINDOW: &str = "main";
pub const LEARNING_SCREEN_EVENT: &str = "openLearningScreen";

/// Forwards monitor events to every webview.
struct TauriEvents {
    app: AppHandle,
}

impl EventSink for TauriEvents {
    fn emit(&self, event: &MonitorEvent) {
        let payload = event.app_id().map(ApplicationId::as_str);
        if let Err(e) = self.app.emit(event.name(), payload) {
            warn!("Failed to emit {}: {e}", event.name());
        }
    }
}

/// Brings the main window forward on its learning screen.
struct TauriNavigator {
    app: AppHandle,
}

impl Navigator for TauriNavigator {
    fn open_break_surface(&self) {
        let Some(window) = self.app.get_webview_window(MAIN_WINDOW) else {
            warn!("Main window missing, cannot open learning screen");
            return;
        };
        if let Err(e) = window.show().and_then(|()| window.set_focus()) {
            warn!("Failed to focus main window: {e}");
        }
        if let Err(e) = self.app.emit_to(MAIN_WINDOW, LEARNING_SCREEN_EVENT, ()) {
            warn!("Failed to emit {LEARNING_SCREEN_EVENT}: {e}");
        }
    }
}

fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Falling back to default configuration: {e}");
            AppConfig::default()
        }
    }
}

fn show_main_window(app: &AppHandle) {
    if let Some(window) = app.get_webview_window(MAIN_WINDOW) {
        if let Err(e) = window.show().and_then(|()| window.set_focus()) {
            warn!("Failed to show main window: {e}");
        }
    }
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .on_window_event(|window, event| {
            // The main window only hides, the navigator brings it back.
            if let WindowEvent::CloseRequested { api, .. } = event {
                if window.label() == MAIN_WINDOW {
                    api.prevent_close();
                    if let Err(e) = window.hide() {
                        warn!("Failed to hide main window: {e}");
                    }
                }
            }
        })
        .setup(|app| {
            let config = load_config();
            let host = Arc::new(NativeHost::new(config.monitor().sample_window));
            let handle = app.handle().clone();

            let controller = Arc::new(Controller::new(
                &config,
                HostServices {
                    usage: Arc::<NativeHost>::clone(&host),
                    capabilities: Arc::<NativeHost>::clone(&host),
                    labels: host,
                    surface: Box::new(TauriOverlay::new(handle.clone())),
                    navigator: Arc::new(TauriNavigator {
                        app: handle.clone(),
                    }),
                    events: Arc::new(TauriEvents { app: handle }),
                },
            ));
            app.manage(controller);

            WebviewWindowBuilder::new(app, MAIN_WINDOW, WebviewUrl::App("index.html".into()))
                .title("Nudge")
                .inner_size(480.0, 640.0)
                .build()?;

            // Setup tray
            let open = MenuItem::with_id(app, "open", "Open Nudge", true, None::<&str>)?;
            let stop = MenuItem::with_id(app, "stop", "Stop Monitoring", true, None::<&str>)?;
            let quit = MenuItem::with_id(app, "quit", "Quit Nudge", true, None::<&str>)?;
            let menu = Menu::with_items(app, &[&open, &stop, &quit])?;

            let mut tray = TrayIconBuilder::new().menu(&menu).tooltip("Nudge");
            if let Some(icon) = app.default_window_icon() {
                tray = tray.icon(icon.clone());
            }
            let _tray = tray
                .on_menu_event(|app, event| {
                    let Some(controller) = app.try_state::<Arc<Controller>>() else {
                        return;
                    };
                    if event.id == "open" {
                        show_main_window(app);
                    } else if event.id == "stop" {
                        // Stopping and quitting wait on the overlay lock,
                        // whose holder may need the event loop.
                        let controller = Arc::clone(controller.inner());
                        thread::spawn(move || {
                            controller.stop_monitoring();
                        });
                    } else if event.id == "quit" {
                        let controller = Arc::clone(controller.inner());
                        let app = app.clone();
                        thread::spawn(move || {
                            controller.shutdown();
                            info!("Monitor shut down, exiting");
                            app.exit(0);
                        });
                    }
                })
                .build(app)?;

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::start_monitoring,
            commands::stop_monitoring,
            commands::check_overlay_permission,
            commands::request_overlay_permission,
            commands::check_usage_permission,
            commands::request_usage_permission,
            commands::overlay_redirect,
            commands::overlay_dismiss,
            commands::get_monitor_state,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app, event| {
            // Keep monitoring from the tray after the last window closes.
            if let RunEvent::ExitRequested {
                code: None, api, ..
            } = event
            {
                api.prevent_exit();
            }
        });
}
