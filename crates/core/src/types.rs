use thiserror::Error;

/// The main error type for upkeep operations
///
/// Task failures are not errors: a command that runs and exits non-zero is
/// recorded in an [`ExecutionResult`](crate::results::ExecutionResult).
#[derive(Debug, Error)]
pub enum UpkeepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    #[error("Unknown task '{0}'")]
    UnknownTask(String),
}

/// Reasons a desktop notification could not be delivered
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("no desktop session available")]
    NoSession,

    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Result type alias for upkeep operations
pub type UpkeepResult<T> = Result<T, UpkeepError>;
