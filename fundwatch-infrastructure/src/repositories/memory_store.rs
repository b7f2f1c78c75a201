use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fundwatch_domain::{EventId, EventQuery, EventStore, NewEvent, StorageError, UserEvent};

#[derive(Default)]
pub struct InMemoryEventStore {
    events: RwLock<Vec<UserEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn append(&self, event: &NewEvent) -> Result<UserEvent, StorageError> {
        let stored = event
            .clone()
            .into_stored(EventId(Uuid::new_v4().to_string()));
        self.events.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn query(&self, query: &EventQuery) -> Result<Vec<UserEvent>, StorageError> {
        let matching = self
            .events
            .read()
            .await
            .iter()
            .filter(|event| query.matches(event))
            .cloned()
            .collect();
        Ok(query.arrange(matching))
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
