//! Shared test doubles for the host traits.
//!
//! Each fake records what the core asked of it so tests can assert on calls
//! without a display server.

#![cfg(test)]

use crate::error::{HostError, OverlayError};
use crate::events::{EventSink, MonitorEvent};
use crate::models::{ApplicationId, TimeWindow, UsageRecord};
use crate::monitor::{CancelToken, MonitorHooks};
use crate::overlay::{Navigator, OverlayContent, OverlaySurface};
use crate::platform::{AppLabels, CapabilityHost, UsageSource};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

pub fn app(id: &str) -> ApplicationId {
    ApplicationId::parse(id).expect("valid test app id")
}

pub fn record_now(id: &str) -> UsageRecord {
    UsageRecord::new(app(id), SystemTime::now(), Duration::ZERO)
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

enum Scripted {
    Records(Vec<UsageRecord>),
    /// Foreground app stamped with the queried window's end.
    Foreground(Option<ApplicationId>),
    DailyTotal(ApplicationId, Duration),
    Error,
}

/// Usage source that replays queued answers, then reports nothing.
#[derive(Default)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
    last_window: Mutex<Option<TimeWindow>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn enqueue(&self, item: Scripted) {
        self.script.lock().unwrap().push_back(item);
    }

    pub fn push(&self, records: Vec<UsageRecord>) {
        self.enqueue(Scripted::Records(records));
    }

    pub fn push_foreground(&self, id: Option<&str>) {
        self.enqueue(Scripted::Foreground(id.map(app)));
    }

    pub fn push_daily_total(&self, id: &str, total: Duration) {
        self.enqueue(Scripted::DailyTotal(app(id), total));
    }

    pub fn push_error(&self) {
        self.enqueue(Scripted::Error);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_window(&self) -> Option<TimeWindow> {
        *self.last_window.lock().unwrap()
    }
}

impl UsageSource for ScriptedSource {
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>, HostError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some(window);

        match self.script.lock().unwrap().pop_front() {
            None | Some(Scripted::Foreground(None)) => Ok(Vec::new()),
            Some(Scripted::Records(records)) => Ok(records),
            Some(Scripted::Foreground(Some(id))) => {
                Ok(vec![UsageRecord::new(id, window.end, Duration::ZERO)])
            }
            Some(Scripted::DailyTotal(id, total)) => {
                Ok(vec![UsageRecord::new(id, window.end, total)])
            }
            Some(Scripted::Error) => Err(HostError::Unavailable("scripted failure".into())),
        }
    }
}

#[derive(Default)]
struct Gate {
    entered: bool,
    released: bool,
}

/// Usage source whose queries block until released, to hold a tick in flight.
pub struct BlockingSource {
    foreground: ApplicationId,
    gate: Mutex<Gate>,
    signal: Condvar,
    returned: AtomicUsize,
}

impl BlockingSource {
    pub fn new(foreground: &str) -> Self {
        Self {
            foreground: app(foreground),
            gate: Mutex::new(Gate::default()),
            signal: Condvar::new(),
            returned: AtomicUsize::new(0),
        }
    }

    pub fn wait_entered(&self, timeout: Duration) -> bool {
        let gate = self.gate.lock().unwrap();
        let (gate, _) = self
            .signal
            .wait_timeout_while(gate, timeout, |g| !g.entered)
            .unwrap();
        gate.entered
    }

    pub fn release(&self) {
        self.gate.lock().unwrap().released = true;
        self.signal.notify_all();
    }

    pub fn returned(&self) -> usize {
        self.returned.load(Ordering::SeqCst)
    }
}

impl UsageSource for BlockingSource {
    fn query_usage(&self, window: TimeWindow) -> Result<Vec<UsageRecord>, HostError> {
        let mut gate = self.gate.lock().unwrap();
        gate.entered = true;
        self.signal.notify_all();
        let gate = self.signal.wait_while(gate, |g| !g.released).unwrap();
        drop(gate);

        self.returned.fetch_add(1, Ordering::SeqCst);
        Ok(vec![UsageRecord::new(
            self.foreground.clone(),
            window.end,
            Duration::ZERO,
        )])
    }
}

pub struct FakeCapabilities {
    usage_check: Mutex<Option<bool>>,
    overlay: AtomicBool,
    usage_requests: AtomicUsize,
    overlay_requests: AtomicUsize,
}

impl FakeCapabilities {
    pub fn granted() -> Self {
        Self {
            usage_check: Mutex::new(Some(true)),
            overlay: AtomicBool::new(true),
            usage_requests: AtomicUsize::new(0),
            overlay_requests: AtomicUsize::new(0),
        }
    }

    pub fn set_usage_check(&self, check: Option<bool>) {
        *self.usage_check.lock().unwrap() = check;
    }

    pub fn set_overlay(&self, granted: bool) {
        self.overlay.store(granted, Ordering::SeqCst);
    }

    pub fn usage_requests(&self) -> usize {
        self.usage_requests.load(Ordering::SeqCst)
    }

    pub fn overlay_requests(&self) -> usize {
        self.overlay_requests.load(Ordering::SeqCst)
    }
}

impl CapabilityHost for FakeCapabilities {
    fn usage_access_check(&self) -> Option<bool> {
        *self.usage_check.lock().unwrap()
    }

    fn overlay_access(&self) -> bool {
        self.overlay.load(Ordering::SeqCst)
    }

    fn open_usage_settings(&self) {
        self.usage_requests.fetch_add(1, Ordering::SeqCst);
    }

    fn open_overlay_settings(&self) {
        self.overlay_requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeLabels(HashMap<ApplicationId, String>);

impl FakeLabels {
    pub fn with<'a>(labels: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self(
            labels
                .into_iter()
                .map(|(id, name)| (app(id), name.to_string()))
                .collect(),
        )
    }
}

impl AppLabels for FakeLabels {
    fn display_name(&self, app: &ApplicationId) -> Option<String> {
        self.0.get(app).cloned()
    }
}

#[derive(Default)]
pub struct RecordingHooks {
    events: Mutex<Vec<MonitorEvent>>,
}

impl RecordingHooks {
    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn distractions(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, MonitorEvent::Distraction(_)))
            .count()
    }
}

impl MonitorHooks for RecordingHooks {
    fn on_foreground_change(&self, app: Option<&ApplicationId>) {
        self.events
            .lock()
            .unwrap()
            .push(MonitorEvent::ForegroundAppUpdate(app.cloned()));
    }

    fn on_distraction(&self, app: &ApplicationId, _cancel: &CancelToken) {
        self.events
            .lock()
            .unwrap()
            .push(MonitorEvent::Distraction(app.clone()));
    }
}

/// Recording hooks whose first foreground change blocks until released, to
/// hold a tick between detection and dispatch.
#[derive(Default)]
pub struct GatedHooks {
    inner: RecordingHooks,
    gate: Mutex<Gate>,
    signal: Condvar,
}

impl GatedHooks {
    pub fn wait_entered(&self, timeout: Duration) -> bool {
        let gate = self.gate.lock().unwrap();
        let (gate, _) = self
            .signal
            .wait_timeout_while(gate, timeout, |g| !g.entered)
            .unwrap();
        gate.entered
    }

    pub fn release(&self) {
        self.gate.lock().unwrap().released = true;
        self.signal.notify_all();
    }

    pub fn distractions(&self) -> usize {
        self.inner.distractions()
    }
}

impl MonitorHooks for GatedHooks {
    fn on_foreground_change(&self, app: Option<&ApplicationId>) {
        let mut gate = self.gate.lock().unwrap();
        if !gate.entered {
            gate.entered = true;
            self.signal.notify_all();
            gate = self.signal.wait_while(gate, |g| !g.released).unwrap();
        }
        drop(gate);
        self.inner.on_foreground_change(app);
    }

    fn on_distraction(&self, app: &ApplicationId, cancel: &CancelToken) {
        self.inner.on_distraction(app, cancel);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<MonitorEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &MonitorEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[derive(Default)]
struct SurfaceLog {
    inserts: usize,
    removes: usize,
    terminations: usize,
    present: bool,
    fail_next_insert: bool,
    last_content: Option<OverlayContent>,
}

/// Overlay surface that records calls. Clones share the same log.
#[derive(Clone, Default)]
pub struct RecordingSurface(Arc<Mutex<SurfaceLog>>);

impl RecordingSurface {
    pub fn fail_next_insert(&self) {
        self.0.lock().unwrap().fail_next_insert = true;
    }

    /// The host closed the surface without going through the overlay.
    pub fn vanish(&self) {
        self.0.lock().unwrap().present = false;
    }

    pub fn inserts(&self) -> usize {
        self.0.lock().unwrap().inserts
    }

    pub fn removes(&self) -> usize {
        self.0.lock().unwrap().removes
    }

    pub fn terminations(&self) -> usize {
        self.0.lock().unwrap().terminations
    }

    pub fn last_content(&self) -> Option<OverlayContent> {
        self.0.lock().unwrap().last_content.clone()
    }
}

impl OverlaySurface for RecordingSurface {
    fn insert(&mut self, content: &OverlayContent) -> Result<(), OverlayError> {
        let mut log = self.0.lock().unwrap();
        log.inserts += 1;
        if std::mem::take(&mut log.fail_next_insert) {
            return Err(OverlayError::InsertionFailed("window refused".into()));
        }
        log.last_content = Some(content.clone());
        log.present = true;
        Ok(())
    }

    fn remove(&mut self) -> Result<(), OverlayError> {
        let mut log = self.0.lock().unwrap();
        log.removes += 1;
        log.present = false;
        Ok(())
    }

    fn terminate(&mut self) {
        let mut log = self.0.lock().unwrap();
        log.terminations += 1;
        log.present = false;
    }

    fn is_present(&self) -> bool {
        self.0.lock().unwrap().present
    }
}

#[derive(Default)]
pub struct RecordingNavigator(AtomicUsize);

impl RecordingNavigator {
    pub fn opened(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn open_break_surface(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}
