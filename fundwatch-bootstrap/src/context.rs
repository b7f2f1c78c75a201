use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use fundwatch_application::AppState;
use fundwatch_domain::EventStore;
use fundwatch_infrastructure::{
    AppConfig, ClickhouseEventStore, InMemoryEventStore, StoreBackend, TimeoutEventStore,
};

use crate::readiness::wait_for_store;

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();

        let backend: Arc<dyn EventStore> = match config.store_backend {
            StoreBackend::Clickhouse => {
                let db_config = config.to_db_config();
                info!(
                    url = %db_config.clickhouse_url,
                    database = %db_config.clickhouse_database,
                    "using clickhouse event store"
                );
                Arc::new(ClickhouseEventStore::connect(&db_config))
            }
            StoreBackend::Memory => {
                info!("using in-memory event store; events are lost on restart");
                Arc::new(InMemoryEventStore::new())
            }
        };
        let store: Arc<dyn EventStore> = Arc::new(TimeoutEventStore::new(
            backend,
            Duration::from_millis(runtime_config.storage_timeout_ms),
        ));

        wait_for_store(
            store.as_ref(),
            config.startup_retry_attempts,
            Duration::from_secs(config.startup_retry_delay_seconds),
        )
        .await
        .context("event store unavailable")?;

        Ok(Self {
            state: AppState::new(runtime_config, store),
        })
    }
}
