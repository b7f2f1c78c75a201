// Runtime configuration shared across layers

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub storage_timeout_ms: u64,
    pub serialize_per_user: bool,
}

impl RuntimeConfig {
    // A fifth of the request timeout is left for writing the response before
    // the HTTP layer gives up.
    pub fn ingest_budget(&self) -> Duration {
        Duration::from_millis(self.request_timeout_seconds.saturating_mul(1000) / 5 * 4)
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
