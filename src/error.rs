//! Error types of the queue operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type for queue operations
pub type Result<T> = std::result::Result<T, QueueError>;

/// Failures reported by queue operations.
///
/// Every operation reports failure through its own return value; none of them
/// panics on ordinary misuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A queue handle was required but none was given.
    #[error("queue handle is missing")]
    InvalidArgument,

    /// The node or its string payload could not be allocated.
    #[error("failed to allocate queue storage")]
    Allocation,

    /// The operation requires at least one element.
    #[error("operation requires a non-empty queue")]
    EmptyCollection,
}

impl From<TryReserveError> for QueueError {
    fn from(_: TryReserveError) -> Self {
        QueueError::Allocation
    }
}
