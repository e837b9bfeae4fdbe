use crate::constants::{MAX_APP_ID_LEN, MAX_INTERVAL_MS, MIN_POLL_INTERVAL_MS};
use crate::error::AppError;

/// Validate an application identifier (package, bundle id or window class).
pub fn validate_app_id(raw: &str) -> Result<(), AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput {
            field: "app_id",
            reason: "must not be empty".into(),
        });
    }
    if trimmed.len() > MAX_APP_ID_LEN {
        return Err(AppError::InvalidInput {
            field: "app_id",
            reason: format!("cannot exceed {MAX_APP_ID_LEN} bytes"),
        });
    }
    if trimmed.chars().any(char::is_control) {
        return Err(AppError::InvalidInput {
            field: "app_id",
            reason: "must not contain control characters".into(),
        });
    }
    Ok(())
}

/// Validate the period between two samples.
pub fn validate_poll_interval_ms(interval_ms: u64) -> Result<(), AppError> {
    if !(MIN_POLL_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&interval_ms) {
        return Err(AppError::InvalidInput {
            field: "poll_interval_ms",
            reason: format!("must be between {MIN_POLL_INTERVAL_MS} and {MAX_INTERVAL_MS}"),
        });
    }
    Ok(())
}

/// Validate the trailing sample window. It must cover at least one poll period
/// so a foreground app cannot slip between two samples.
pub fn validate_sample_window_ms(window_ms: u64, poll_interval_ms: u64) -> Result<(), AppError> {
    if window_ms < poll_interval_ms {
        return Err(AppError::InvalidInput {
            field: "sample_window_ms",
            reason: "cannot be shorter than poll_interval_ms".into(),
        });
    }
    if window_ms > MAX_INTERVAL_MS {
        return Err(AppError::InvalidInput {
            field: "sample_window_ms",
            reason: format!("cannot exceed {MAX_INTERVAL_MS}"),
        });
    }
    Ok(())
}
