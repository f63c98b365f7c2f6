//! Errors raised by the in-process infrastructure.

/// Timer scheduling failures.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("no async runtime available to run timers")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
