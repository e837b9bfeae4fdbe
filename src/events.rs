use crate::models::ApplicationId;

/// Outbound notifications for the collaborator driving the control surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Fired on every change of foreground app, watched or not.
    ForegroundAppUpdate(Option<ApplicationId>),
    /// Fired once per switch into a watched app.
    Distraction(ApplicationId),
}

impl MonitorEvent {
    /// Event name on the collaborator channel.
    pub fn name(&self) -> &'static str {
        match self {
            MonitorEvent::ForegroundAppUpdate(_) => "onForegroundAppUpdate",
            MonitorEvent::Distraction(_) => "onDistraction",
        }
    }

    pub fn app_id(&self) -> Option<&ApplicationId> {
        match self {
            MonitorEvent::ForegroundAppUpdate(app) => app.as_ref(),
            MonitorEvent::Distraction(app) => Some(app),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: &MonitorEvent);
}
