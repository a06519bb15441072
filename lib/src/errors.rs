//! Structured failures surfaced before any schedule entry is emitted.
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// Missing or malformed field in the runnable description.
    #[error("input shape error: {0}")]
    InputShape(String),
    /// Unknown dependency target or a dependency cycle.
    #[error("graph error: {0}")]
    Graph(String),
    /// Unknown scheduling or allocation policy name.
    #[error("unknown policy: {0}")]
    Policy(String),
    /// Non-positive iteration count or horizon.
    #[error("horizon error: {0}")]
    Horizon(String),
    /// Failure to serialize or write a run artifact.
    #[error("output error: {0}")]
    Output(String),
}
