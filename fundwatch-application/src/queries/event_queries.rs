use tracing::error;

use crate::dtos::EventHistoryQuery;
use crate::validation::{parse_event_type, parse_order};
use crate::AppError;
use crate::AppState;
use fundwatch_domain::{EventQuery, UserEvent};

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

pub async fn list_user_events(
    state: &AppState,
    query: EventHistoryQuery,
) -> Result<Vec<UserEvent>, AppError> {
    let mut store_query = EventQuery::for_user(query.user_id)
        .limit(query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT));

    if let Some(raw) = query.event_type.as_deref() {
        store_query = store_query.of_type(parse_event_type(raw.trim())?);
    }
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err(AppError::BadRequest(format!(
                "from ({}) must not be after to ({})",
                from, to
            )));
        }
    }
    if let Some(from) = query.from {
        store_query = store_query.from(from);
    }
    if let Some(to) = query.to {
        store_query = store_query.until(to);
    }
    if let Some(raw) = query.order.as_deref() {
        store_query = store_query.order(parse_order(raw)?);
    }

    state.event_store.query(&store_query).await.map_err(|err| {
        error!(user_id = query.user_id, "failed to fetch events: {}", err);
        AppError::Storage(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fundwatch_domain::{EventStore, EventType, NewEvent, RuntimeConfig};
    use fundwatch_infrastructure::InMemoryEventStore;
    use rust_decimal_macros::dec;

    async fn seeded_state() -> AppState {
        let store = Arc::new(InMemoryEventStore::new());
        for (event_type, amount, t) in [
            (EventType::Deposit, dec!(10), 30),
            (EventType::Withdraw, dec!(5), 10),
            (EventType::Deposit, dec!(20), 20),
        ] {
            store
                .append(&NewEvent::new(9, event_type, amount, t))
                .await
                .unwrap();
        }
        store
            .append(&NewEvent::new(10, EventType::Deposit, dec!(1), 15))
            .await
            .unwrap();
        let config = RuntimeConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            max_body_bytes: 1024,
            request_timeout_seconds: 5,
            storage_timeout_ms: 1000,
            serialize_per_user: false,
        };
        AppState::new(config, store)
    }

    fn history(user_id: i64) -> EventHistoryQuery {
        EventHistoryQuery {
            user_id,
            ..EventHistoryQuery::default()
        }
    }

    #[tokio::test]
    async fn lists_one_users_events_in_timestamp_order() {
        let state = seeded_state().await;
        let events = list_user_events(&state, history(9)).await.unwrap();
        let timestamps: Vec<i64> = events.iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn applies_filters_order_and_limit() {
        let state = seeded_state().await;
        let query = EventHistoryQuery {
            event_type: Some("deposit".to_string()),
            to: Some(30),
            order: Some("desc".to_string()),
            limit: Some(1),
            ..history(9)
        };
        let events = list_user_events(&state, query).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp, 30);
        assert_eq!(events[0].amount, dec!(10));
    }

    #[tokio::test]
    async fn rejects_inverted_range_and_bad_type() {
        let state = seeded_state().await;
        let inverted = EventHistoryQuery {
            from: Some(20),
            to: Some(10),
            ..history(9)
        };
        assert!(matches!(
            list_user_events(&state, inverted).await,
            Err(AppError::BadRequest(_))
        ));

        let bad_type = EventHistoryQuery {
            event_type: Some("loan".to_string()),
            ..history(9)
        };
        assert!(matches!(
            list_user_events(&state, bad_type).await,
            Err(AppError::BadRequest(_))
        ));
    }
}
