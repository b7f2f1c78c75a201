use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::warn;

use fundwatch_domain::{EventQuery, EventStore, NewEvent, StorageError, UserEvent};

// An `append` cut off by the timeout may still complete on the server side.
pub struct TimeoutEventStore {
    inner: Arc<dyn EventStore>,
    limit: Duration,
}

impl TimeoutEventStore {
    pub fn new(inner: Arc<dyn EventStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, StorageError>> + Send,
    ) -> Result<T, StorageError> {
        match timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.limit.as_millis() as u64,
                    "event store call timed out"
                );
                Err(StorageError::Timeout(self.limit))
            }
        }
    }
}

#[async_trait]
impl EventStore for TimeoutEventStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        self.bounded("ensure_schema", self.inner.ensure_schema()).await
    }

    async fn append(&self, event: &NewEvent) -> Result<UserEvent, StorageError> {
        self.bounded("append", self.inner.append(event)).await
    }

    async fn query(&self, query: &EventQuery) -> Result<Vec<UserEvent>, StorageError> {
        self.bounded("query", self.inner.query(query)).await
    }

    async fn ping(&self) -> Result<(), StorageError> {
        self.bounded("ping", self.inner.ping()).await
    }
}
