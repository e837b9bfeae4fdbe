pub mod app;
pub mod state;

pub use app::{ApplicationId, SampleResult, TimeWindow, UsageRecord};
pub use state::{Capability, MonitorState, OverlayState, StartOutcome, StopAck};
