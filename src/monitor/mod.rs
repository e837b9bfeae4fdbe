//! The foreground monitor loop.
//!
//! Each successful [`Monitor::start`] builds a fresh [`MonitorSession`] and a
//! ticker thread that samples the foreground app once per poll interval.
//! Ticks run one at a time; the next one is scheduled only after the previous
//! has finished. The host query happens outside the session lock, and its
//! result is dropped if the session stopped in the meantime. Hooks run
//! outside every monitor lock, so each activation also carries a
//! [`CancelToken`] that is checked right before each hook.

mod session;
mod watch_list;

pub use session::{MonitorSession, TickOutcome};
pub use watch_list::WatchList;

use crate::capability::CapabilityGate;
use crate::config::MonitorConfig;
use crate::error::AppError;
use crate::models::{ApplicationId, Capability, MonitorState};
use crate::sampler::ForegroundSampler;
use crate::sync::safe_lock;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

/// Set when an activation is stopped or replaced. Never reset.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Receives what the monitor detects. Called from the ticker thread with no
/// monitor lock held.
pub trait MonitorHooks: Send + Sync {
    fn on_foreground_change(&self, app: Option<&ApplicationId>);

    /// `cancel` may flip while this runs. Implementations that publish
    /// should check it under the same lock the stopping side takes.
    fn on_distraction(&self, app: &ApplicationId, cancel: &CancelToken);
}

struct Activation {
    token: CancelToken,
    session: Arc<Mutex<MonitorSession>>,
    /// Dropping the sender wakes the ticker out of its wait.
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

impl Activation {
    fn cancel(self) -> JoinHandle<()> {
        self.token.cancel();
        safe_lock(&self.session, "Monitor session").cancel();
        drop(self.cancel);
        self.handle
    }
}

pub struct Monitor {
    config: MonitorConfig,
    gate: Arc<CapabilityGate>,
    sampler: Arc<ForegroundSampler>,
    hooks: Arc<dyn MonitorHooks>,
    active: Mutex<Option<Activation>>,
}

impl Monitor {
    pub fn new(
        config: MonitorConfig,
        gate: Arc<CapabilityGate>,
        sampler: Arc<ForegroundSampler>,
        hooks: Arc<dyn MonitorHooks>,
    ) -> Self {
        Self {
            config,
            gate,
            sampler,
            hooks,
            active: Mutex::new(None),
        }
    }

    /// Start (or restart) monitoring `watch_list`.
    ///
    /// Both capabilities must be granted. A missing usage grant also opens the
    /// usage settings. On failure nothing changes, including any activation
    /// that is already running.
    pub fn start(&self, watch_list: WatchList) -> Result<(), AppError> {
        if let Some(capability) = self.gate.first_missing() {
            warn!("Cannot start monitoring: {capability} missing");
            match capability {
                Capability::UsageAccess => self.gate.request_usage_access(),
                Capability::OverlayAccess => {}
            }
            return Err(AppError::CapabilityDenied { capability });
        }

        let mut active = safe_lock(&self.active, "Monitor");
        if let Some(previous) = active.take() {
            debug!("Replacing previous monitoring activation");
            drop(previous.cancel());
        }

        info!("Monitoring {} app(s)", watch_list.len());
        let token = CancelToken::new();
        let session = Arc::new(Mutex::new(MonitorSession::new(watch_list)));
        let (cancel, cancelled) = mpsc::channel();
        let ticker = Ticker {
            token: token.clone(),
            session: Arc::clone(&session),
            sampler: Arc::clone(&self.sampler),
            hooks: Arc::clone(&self.hooks),
            config: self.config,
        };

        let handle = thread::Builder::new()
            .name("nudge-monitor".into())
            .spawn(move || ticker.run(&cancelled))
            .map_err(|e| AppError::Internal(format!("Failed to spawn monitor thread: {e}")))?;

        *active = Some(Activation {
            token,
            session,
            cancel,
            handle,
        });
        Ok(())
    }

    /// Cancel any pending tick and go idle. Returns whether anything was active.
    pub fn stop(&self) -> bool {
        let previous = safe_lock(&self.active, "Monitor").take();
        match previous {
            Some(activation) => {
                // The ticker exits on its own; an in-flight sample is discarded
                drop(activation.cancel());
                info!("Monitoring stopped");
                true
            }
            None => false,
        }
    }

    /// Stop and wait for the ticker thread to finish.
    pub fn shutdown(&self) {
        let previous = safe_lock(&self.active, "Monitor").take();
        if let Some(activation) = previous {
            if activation.cancel().join().is_err() {
                warn!("Monitor thread panicked");
            }
        }
    }

    pub fn state(&self) -> MonitorState {
        safe_lock(&self.active, "Monitor")
            .as_ref()
            .map_or(MonitorState::Idle, |activation| {
                safe_lock(&activation.session, "Monitor session").state()
            })
    }

    /// Watch-list of the current activation; empty when idle.
    pub fn watch_list(&self) -> WatchList {
        safe_lock(&self.active, "Monitor")
            .as_ref()
            .map(|activation| {
                safe_lock(&activation.session, "Monitor session")
                    .watch_list()
                    .clone()
            })
            .unwrap_or_default()
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Ticker {
    token: CancelToken,
    session: Arc<Mutex<MonitorSession>>,
    sampler: Arc<ForegroundSampler>,
    hooks: Arc<dyn MonitorHooks>,
    config: MonitorConfig,
}

impl Ticker {
    fn run(self, cancelled: &Receiver<()>) {
        while self.tick() {
            match cancelled.recv_timeout(self.config.poll_interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        debug!("Monitor ticker exiting");
    }

    /// One sample. Returns whether another tick should be scheduled.
    fn tick(&self) -> bool {
        if !safe_lock(&self.session, "Monitor session").is_running() {
            return false;
        }

        let result = self.sampler.sample(self.config.sample_window);
        let outcome = safe_lock(&self.session, "Monitor session").observe(result);

        match outcome {
            TickOutcome::Discarded => false,
            TickOutcome::Unchanged => true,
            TickOutcome::Switched(app) => {
                debug!("Foreground app changed to {app}");
                if self.cancelled() {
                    return false;
                }
                self.hooks.on_foreground_change(Some(&app));
                true
            }
            TickOutcome::Distraction(app) => {
                info!("Watched app {app} came to the foreground");
                if self.cancelled() {
                    return false;
                }
                self.hooks.on_foreground_change(Some(&app));
                if self.cancelled() {
                    return false;
                }
                self.hooks.on_distraction(&app, &self.token);
                false
            }
        }
    }

    fn cancelled(&self) -> bool {
        let cancelled = self.token.is_cancelled();
        if cancelled {
            debug!("Activation cancelled mid-tick, dropping detection");
        }
        cancelled
    }
}
