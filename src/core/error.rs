//! Error types for elevator operations.

use thiserror::Error;

/// Errors produced by the elevator core.
///
/// Lifecycle no-ops (starting a running car, stopping a stopped one) are not
/// errors; see [`StartOutcome`](crate::core::StartOutcome) and
/// [`StopOutcome`](crate::core::StopOutcome).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ElevatorError {
    /// Out-of-range floor, equal origin/destination, or unknown pet kind.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The car is offline and does not accept requests.
    #[error("elevator is offline")]
    Offline,
    /// Queue space or an actor thread could not be allocated.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),
    /// A blocking wait was cut short because an actor went away.
    #[error("interrupted: {0}")]
    Interrupted(String),
    /// A bounded wait elapsed.
    #[error("timed out waiting for {0}")]
    Timeout(String),
    /// Configuration validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ElevatorError {
    /// Whether the caller may simply retry the operation later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ResourceExhausted(_) | Self::Interrupted(_) | Self::Timeout(_)
        )
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
