use async_trait::async_trait;

use crate::entities::{EventQuery, NewEvent, UserEvent};
use crate::error::StorageError;

// `append` is atomic: on `Ok` the event is visible to every later `query`,
// on `Err` nothing was stored.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn ensure_schema(&self) -> Result<(), StorageError>;
    async fn append(&self, event: &NewEvent) -> Result<UserEvent, StorageError>;
    async fn query(&self, query: &EventQuery) -> Result<Vec<UserEvent>, StorageError>;
    async fn ping(&self) -> Result<(), StorageError>;
}
