use super::WatchList;
use crate::models::{ApplicationId, MonitorState, SampleResult};

/// What one tick decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session stopped or suspended while the sample was in flight.
    Discarded,
    /// Nothing attributable, or the same app as last tick.
    Unchanged,
    /// A new foreground app that is not watched.
    Switched(ApplicationId),
    /// A new foreground app that is watched. The session is now suspended.
    Distraction(ApplicationId),
}

/// State of one monitoring activation. A fresh session is built on every
/// start, so the watch-list and the last-seen app never outlive it.
#[derive(Debug)]
pub struct MonitorSession {
    state: MonitorState,
    watch_list: WatchList,
    last_foreground: Option<ApplicationId>,
}

impl MonitorSession {
    pub fn new(watch_list: WatchList) -> Self {
        Self {
            state: MonitorState::Running,
            watch_list,
            last_foreground: None,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == MonitorState::Running
    }

    pub fn watch_list(&self) -> &WatchList {
        &self.watch_list
    }

    pub fn last_foreground(&self) -> Option<&ApplicationId> {
        self.last_foreground.as_ref()
    }

    /// Apply one sample. Only a change of foreground app is actionable.
    pub fn observe(&mut self, result: SampleResult) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Discarded;
        }

        let SampleResult::Identifier(app) = result else {
            return TickOutcome::Unchanged;
        };
        if self.last_foreground.as_ref() == Some(&app) {
            return TickOutcome::Unchanged;
        }

        self.last_foreground = Some(app.clone());
        if self.watch_list.contains(&app) {
            self.state = MonitorState::Suspended;
            TickOutcome::Distraction(app)
        } else {
            TickOutcome::Switched(app)
        }
    }

    /// Idempotent.
    pub fn cancel(&mut self) {
        self.state = MonitorState::Idle;
    }
}
