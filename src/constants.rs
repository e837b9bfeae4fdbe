// src/constants.rs

/// Seconds in one day (24 * 60 * 60)
pub const SECS_PER_DAY: u64 = 86400;

/// Default period between two foreground samples, in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Default trailing window a sample looks back over, in milliseconds
pub const DEFAULT_SAMPLE_WINDOW_MS: u64 = 5000;

/// Shortest accepted poll interval, in milliseconds
pub const MIN_POLL_INTERVAL_MS: u64 = 100;

/// Longest accepted poll interval or sample window, in milliseconds
pub const MAX_INTERVAL_MS: u64 = 60_000;

/// Window used to infer usage access from a non-empty query (24 hours)
pub const USAGE_PROBE_WINDOW_SECS: u64 = SECS_PER_DAY;

/// Maximum application identifier length, in bytes
pub const MAX_APP_ID_LEN: usize = 256;

/// Display name used when the host cannot label an application
pub const FALLBACK_APP_LABEL: &str = "the app";
