//! In-memory, same-day record of which application held the foreground.
//!
//! Native hosts only see the current foreground app, so they feed every
//! observation in here and answer usage queries from it. Nothing is persisted
//! and the log starts over at UTC midnight.

use crate::models::{ApplicationId, TimeWindow, UsageRecord};
use std::collections::HashMap;
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone, Copy)]
struct Entry {
    last_active: SystemTime,
    total: Duration,
}

#[derive(Debug)]
pub struct RecencyLog {
    day_start: Option<SystemTime>,
    current: Option<(ApplicationId, SystemTime)>,
    entries: HashMap<ApplicationId, Entry>,
    /// Upper bound credited between two observations, so gaps (sleep,
    /// suspended monitoring) are not counted as foreground time.
    max_gap: Duration,
}

impl RecencyLog {
    pub fn new(max_gap: Duration) -> Self {
        Self {
            day_start: None,
            current: None,
            entries: HashMap::new(),
            max_gap,
        }
    }

    /// Record that `app` (or nothing) is in the foreground at `at`.
    pub fn record(&mut self, app: Option<ApplicationId>, at: SystemTime) {
        let today = TimeWindow::today(at).start;
        if self.day_start != Some(today) {
            self.day_start = Some(today);
            self.entries.clear();
            self.current = None;
        }

        if let Some((previous, since)) = self.current.take() {
            let elapsed = at
                .duration_since(since)
                .unwrap_or(Duration::ZERO)
                .min(self.max_gap);
            if let Some(entry) = self.entries.get_mut(&previous) {
                entry.total += elapsed;
            }
        }

        if let Some(app) = app {
            self.entries
                .entry(app.clone())
                .and_modify(|e| e.last_active = at)
                .or_insert(Entry {
                    last_active: at,
                    total: Duration::ZERO,
                });
            self.current = Some((app, at));
        }
    }

    /// Applications whose last activity falls inside `window`.
    pub fn records(&self, window: TimeWindow) -> Vec<UsageRecord> {
        self.entries
            .iter()
            .filter(|(_, entry)| window.contains(entry.last_active))
            .map(|(app, entry)| UsageRecord::new(app.clone(), entry.last_active, entry.total))
            .collect()
    }
}
