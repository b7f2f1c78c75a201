use std::str::FromStr;

use async_trait::async_trait;
use clickhouse::{Client, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use fundwatch_domain::{
    DbConfig, EventId, EventQuery, EventStore, EventType, NewEvent, StorageError, UserEvent,
};

const EVENTS_TABLE: &str = "user_events";

// Amounts are kept as canonical decimal text so no precision is lost between
// the API and the rules.
#[derive(Debug, Clone, Serialize, Deserialize, Row)]
struct EventRow {
    id: String,
    user_id: i64,
    event_type: String,
    amount: String,
    timestamp: i64,
}

impl EventRow {
    fn from_event(event: &NewEvent, id: &EventId) -> Self {
        Self {
            id: id.0.clone(),
            user_id: event.user_id,
            event_type: event.event_type.as_str().to_string(),
            amount: event.amount.normalize().to_string(),
            timestamp: event.timestamp,
        }
    }

    fn into_event(self) -> Result<UserEvent, StorageError> {
        let event_type = EventType::from_str(&self.event_type)
            .map_err(|err| StorageError::Corrupt(format!("event {}: {}", self.id, err)))?;
        let amount = Decimal::from_str(&self.amount).map_err(|err| {
            StorageError::Corrupt(format!("event {}: amount '{}': {}", self.id, self.amount, err))
        })?;
        Ok(UserEvent {
            id: EventId(self.id),
            user_id: self.user_id,
            event_type,
            amount,
            timestamp: self.timestamp,
        })
    }
}

#[derive(Clone)]
pub struct ClickhouseEventStore {
    client: Client,
    database: String,
}

impl ClickhouseEventStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn connect(config: &DbConfig) -> Self {
        let mut client = Client::default()
            .with_url(&config.clickhouse_url)
            .with_database(&config.clickhouse_database);
        if let Some(user) = &config.clickhouse_user {
            client = client.with_user(user);
        }
        if let Some(password) = &config.clickhouse_password {
            client = client.with_password(password);
        }
        Self::new(client, config.clickhouse_database.clone())
    }
}

#[async_trait]
impl EventStore for ClickhouseEventStore {
    async fn ensure_schema(&self) -> Result<(), StorageError> {
        // The configured database may not exist yet, so create it from `default`.
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client
            .clone()
            .with_database("default")
            .query(&create_db)
            .execute()
            .await
            .map_err(map_clickhouse_error)?;

        let create_events = r#"
CREATE TABLE IF NOT EXISTS user_events (
    id String,
    user_id Int64,
    event_type LowCardinality(String),
    amount String,
    timestamp Int64,
    CONSTRAINT known_event_type CHECK event_type IN ('deposit', 'withdraw'),
    CONSTRAINT positive_amount CHECK toDecimal128OrZero(amount, 18) > 0
) ENGINE = MergeTree
ORDER BY (user_id, timestamp, id)
"#;
        self.client
            .query(create_events)
            .execute()
            .await
            .map_err(map_clickhouse_error)?;
        Ok(())
    }

    async fn append(&self, event: &NewEvent) -> Result<UserEvent, StorageError> {
        let id = EventId(Uuid::new_v4().to_string());
        let row = EventRow::from_event(event, &id);

        // A single-row insert is one block, which ClickHouse applies atomically.
        let mut insert = self
            .client
            .insert(EVENTS_TABLE)
            .map_err(map_clickhouse_error)?;
        insert.write(&row).await.map_err(map_clickhouse_error)?;
        insert.end().await.map_err(map_clickhouse_error)?;

        debug!(user_id = event.user_id, event_id = %id, "event appended");
        Ok(event.clone().into_stored(id))
    }

    async fn query(&self, query: &EventQuery) -> Result<Vec<UserEvent>, StorageError> {
        let sql = build_select(query);
        let mut select = self.client.query(&sql).bind(query.user_id);
        if let Some(event_type) = query.event_type {
            select = select.bind(event_type.as_str());
        }
        if let Some(from) = query.from {
            select = select.bind(from);
        }
        if let Some(to) = query.to {
            select = select.bind(to);
        }
        if let Some(limit) = query.limit {
            select = select.bind(limit as u64);
        }

        let rows = select
            .fetch_all::<EventRow>()
            .await
            .map_err(map_clickhouse_error)?;
        rows.into_iter().map(EventRow::into_event).collect()
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let _: u8 = self
            .client
            .query("SELECT toUInt8(1)")
            .fetch_one()
            .await
            .map_err(map_clickhouse_error)?;
        Ok(())
    }
}

// Placeholders appear in bind order: user_id, type, from, to, limit.
fn build_select(query: &EventQuery) -> String {
    let mut sql = format!("SELECT ?fields FROM {} WHERE user_id = ?", EVENTS_TABLE);
    if query.event_type.is_some() {
        sql.push_str(" AND event_type = ?");
    }
    if query.from.is_some() {
        sql.push_str(" AND timestamp >= ?");
    }
    if query.to.is_some() {
        sql.push_str(" AND timestamp <= ?");
    }
    let direction = query.order.as_sql();
    sql.push_str(&format!(
        " ORDER BY timestamp {}, id {}",
        direction, direction
    ));
    if query.limit.is_some() {
        sql.push_str(" LIMIT ?");
    }
    sql
}

fn map_clickhouse_error(err: clickhouse::error::Error) -> StorageError {
    match err {
        clickhouse::error::Error::Network(inner) => StorageError::Connection(inner.to_string()),
        clickhouse::error::Error::BadResponse(message) => {
            if message.contains("VIOLATED_CONSTRAINT") {
                StorageError::Constraint(message)
            } else {
                StorageError::Backend(message)
            }
        }
        other => StorageError::Backend(other.to_string()),
    }
}
