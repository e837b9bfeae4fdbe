use crate::models::Capability;
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{capability} has not been granted")]
    CapabilityDenied { capability: Capability },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Internal(String),
}

// For Tauri command returns - converts AppError to String
impl From<AppError> for String {
    fn from(e: AppError) -> Self {
        e.to_string()
    }
}

/// Failure reported by the host usage facility. Never leaves the sampler.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("usage data unavailable: {0}")]
    Unavailable(String),
}

/// Failure placing or removing the overlay surface. Caught by the overlay.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("overlay insertion failed: {0}")]
    InsertionFailed(String),

    #[error("overlay removal failed: {0}")]
    RemovalFailed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine project directories")]
    NoProjectDirs,

    #[error("Could not read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Could not parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Invalid(Box<AppError>),
}
