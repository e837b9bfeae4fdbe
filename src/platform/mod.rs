pub mod recency;
pub mod types;

pub use types::{AppLabels, CapabilityHost, UsageSource};

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub use macos::MacOSHost as NativeHost;

#[cfg(target_os = "linux")]
pub use linux::LinuxHost as NativeHost;

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub use unsupported::UnsupportedHost as NativeHost;

// Stub for development on other platforms
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
mod unsupported {
    use super::{AppLabels, CapabilityHost, UsageSource};
    use crate::error::HostError;
    use crate::models::{ApplicationId, TimeWindow, UsageRecord};
    use std::time::Duration;

    #[derive(Default)]
    pub struct UnsupportedHost;

    impl UnsupportedHost {
        pub fn new(_sample_window: Duration) -> Self {
            Self
        }
    }

    impl UsageSource for UnsupportedHost {
        fn query_usage(&self, _window: TimeWindow) -> Result<Vec<UsageRecord>, HostError> {
            Err(HostError::Unavailable("unsupported platform".into()))
        }
    }

    impl CapabilityHost for UnsupportedHost {
        fn usage_access_check(&self) -> Option<bool> {
            Some(false)
        }

        fn overlay_access(&self) -> bool {
            true
        }

        fn open_usage_settings(&self) {}

        fn open_overlay_settings(&self) {}
    }

    impl AppLabels for UnsupportedHost {
        fn display_name(&self, _app: &ApplicationId) -> Option<String> {
            None
        }
    }
}
