use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::entities::{EventQuery, NewEvent, UserEvent};
use crate::error::StorageError;
use crate::ports::EventStore;
use crate::value_objects::{EventId, EventType};

// Vec-backed store for rule tests.
#[derive(Default)]
pub struct FixedStore {
    events: Mutex<Vec<UserEvent>>,
    pub fail_queries: bool,
}

impl FixedStore {
    pub fn with(events: Vec<(EventType, Decimal, i64)>) -> Self {
        let store = Self::default();
        {
            let mut stored = store.events.lock().unwrap();
            for (index, (event_type, amount, timestamp)) in events.into_iter().enumerate() {
                stored.push(UserEvent {
                    id: EventId(format!("evt-{:04}", index)),
                    user_id: 1,
                    event_type,
                    amount,
                    timestamp,
                });
            }
        }
        store
    }

    pub fn failing() -> Self {
        Self {
            fail_queries: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl EventStore for FixedStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn append(&self, event: &NewEvent) -> Result<UserEvent, StorageError> {
        let mut stored = self.events.lock().unwrap();
        let stored_event = event
            .clone()
            .into_stored(EventId(format!("evt-{:04}", stored.len())));
        stored.push(stored_event.clone());
        Ok(stored_event)
    }

    async fn query(&self, query: &EventQuery) -> Result<Vec<UserEvent>, StorageError> {
        if self.fail_queries {
            return Err(StorageError::Connection("connection refused".to_string()));
        }
        let matching = self
            .events
            .lock()
            .unwrap()
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

pub fn in_flight(event_type: EventType, amount: Decimal, timestamp: i64) -> UserEvent {
    UserEvent {
        id: EventId("in-flight".to_string()),
        user_id: 1,
        event_type,
        amount,
        timestamp,
    }
}
