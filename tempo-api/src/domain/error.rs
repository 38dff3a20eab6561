use thiserror::Error;

/// Errors that can occur while validating or mutating time entries.
#[derive(Debug, Error)]
pub enum TimeEntryError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("end time must be after start time")]
    EndBeforeStart,
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("invalid date range")]
    InvalidDateRange,
    #[error("timer already running")]
    TimerAlreadyRunning,
    #[error("timer is not running")]
    NotRunning,
}

impl TimeEntryError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }
}
