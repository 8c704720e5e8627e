//! Error types for queue construction.

use thiserror::Error;

/// Errors raised by the queue core.
///
/// Only construction can fail; every other operation is total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("invalid queue configuration: {0}")]
    InvalidConfiguration(String),
}
