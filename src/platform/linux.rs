use super::recency::RecencyLog;
use super::{AppLabels, CapabilityHost, UsageSource};
use crate::constants::DEFAULT_SAMPLE_WINDOW_MS;
use crate::error::HostError;
use crate::models::{ApplicationId, TimeWindow, UsageRecord};
use crate::sync::safe_lock;
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use x11rb::connection::Connection;
use x11rb::protocol::screensaver;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt, Window};

/// Foreground window observed through EWMH properties.
#[derive(Debug, Clone)]
struct ForegroundWindow {
    /// WM_CLASS instance name, used as the application identifier.
    instance: String,
    /// WM_CLASS class name, used as the display name.
    class: String,
}

pub struct LinuxHost {
    conn: Option<x11rb::rust_connection::RustConnection>,
    root: Window,
    /// User idle for longer than this counts as "no foreground app".
    idle_cutoff: Duration,
    log: Mutex<RecencyLog>,
    labels: Mutex<HashMap<ApplicationId, String>>,
}

impl Default for LinuxHost {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SAMPLE_WINDOW_MS))
    }
}

impl LinuxHost {
    pub fn new(sample_window: Duration) -> Self {
        let (conn, root) = match x11rb::connect(None) {
            Ok((conn, screen_num)) => {
                let root = conn.setup().roots.get(screen_num).map(|screen| screen.root);
                match root {
                    Some(root) => (Some(conn), root),
                    None => {
                        warn!("Invalid screen number {screen_num}. Foreground detection disabled.");
                        (None, 0)
                    }
                }
            }
            Err(e) => {
                // Wayland or headless: queries report the host as unavailable
                warn!("Failed to connect to X server: {e}. Foreground detection disabled.");
                (None, 0)
            }
        };

        Self {
            conn,
            root,
            idle_cutoff: sample_window,
            log: Mutex::new(RecencyLog::new(sample_window)),
            labels: Mutex::new(HashMap::new()),
        }
    }

    fn get_atom(&self, name: &str) -> Option<u32> {
        self.conn
            .as_ref()?
            .intern_atom(false, name.as_bytes())
            .ok()?
            .reply()
            .ok()
            .map(|r| r.atom)
    }

    fn get_active_window_id(&self) -> Option<Window> {
        let conn = self.conn.as_ref()?;
        let atom = self.get_atom("_NET_ACTIVE_WINDOW")?;
        let reply = conn
            .get_property(false, self.root, atom, AtomEnum::WINDOW, 0, 1)
            .ok()?
            .reply()
            .ok()?;

        let bytes: [u8; 4] = reply.value.get(..4)?.try_into().ok()?;
        let window = u32::from_ne_bytes(bytes);
        // 0 means no window has focus
        (window != 0).then_some(window)
    }

    fn get_window_class(&self, window: Window) -> Option<ForegroundWindow> {
        let reply = self
            .conn
            .as_ref()?
            .get_property(false, window, AtomEnum::WM_CLASS, AtomEnum::STRING, 0, 1024)
            .ok()?
            .reply()
            .ok()?;

        let raw = String::from_utf8(reply.value).ok()?;
        let mut parts = raw.split('\0').filter(|s| !s.is_empty());
        let instance = parts.next()?.to_string();
        let class = parts.next().unwrap_or(&instance).to_string();
        Some(ForegroundWindow { instance, class })
    }

    fn idle_time(&self) -> Duration {
        let Some(conn) = self.conn.as_ref() else {
            return Duration::ZERO;
        };

        screensaver::query_info(conn, self.root)
            .ok()
            .and_then(|cookie| cookie.reply().ok())
            .map_or(Duration::ZERO, |info| {
                Duration::from_millis(u64::from(info.ms_since_user_input))
            })
    }

    /// Foreground application right now, or `None` when the user has been
    /// idle past the cutoff or nothing has focus.
    fn observe(&self) -> Option<ApplicationId> {
        if self.idle_time() > self.idle_cutoff {
            return None;
        }

        let foreground = self.get_window_class(self.get_active_window_id()?)?;
        let app = ApplicationId::parse(&foreground.instance).ok()?;
        safe_lock(&self.labels, "Labels").insert(app.clone(), foreground.class);
        Some(app)
    }
}

impl UsageSource for LinuxHost {
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>, HostError> {
        if self.conn.is_none() {
            return Err(HostError::Unavailable("no X server connection".into()));
        }

        let observed = self.observe();

        let mut log = safe_lock(&self.log, "Recency log");
        log.record(observed, window.end);
        Ok(log.records(window))
    }
}

impl CapabilityHost for LinuxHost {
    fn usage_access_check(&self) -> Option<bool> {
        Some(self.conn.is_some())
    }

    fn overlay_access(&self) -> bool {
        // X11 places no restriction on always-on-top windows
        true
    }

    fn open_usage_settings(&self) {
        info!("No usage access settings on X11; an X server connection is all that is needed");
    }

    fn open_overlay_settings(&self) {
        info!("No overlay settings on X11");
    }
}

impl AppLabels for LinuxHost {
    fn display_name(&self, app: &ApplicationId) -> Option<String> {
        safe_lock(&self.labels, "Labels").get(app).cloned()
    }
}
