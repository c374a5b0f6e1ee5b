use thiserror::Error;

/// Rejected timing policy. Construction of the tracker cannot proceed.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("{field} must not be negative")]
    NegativeDuration { field: &'static str },
    #[error("min_hold_ms must be > 0")]
    MinHoldNotPositive,
    #[error("max_hold_ms ({max_ms}) must be > min_hold_ms ({min_ms})")]
    MaxNotAboveMin { min_ms: u64, max_ms: u64 },
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid timing policy: {0}")]
    Invalid(#[from] ConfigurationError),
}
