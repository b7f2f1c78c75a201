use thiserror::Error;

use fundwatch_domain::{EventId, StorageError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),
    #[error("event {event_id} was stored but rule evaluation failed: {source}")]
    Evaluation {
        event_id: EventId,
        #[source]
        source: StorageError,
    },
}
