use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage unreachable: {0}")]
    Connection(String),
    #[error("storage constraint violated: {0}")]
    Constraint(String),
    #[error("storage call timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("corrupt stored event: {0}")]
    Corrupt(String),
    #[error("storage failure: {0}")]
    Backend(String),
}
