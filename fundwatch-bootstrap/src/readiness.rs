use std::time::Duration;

use tracing::{info, warn};

use fundwatch_domain::{EventStore, StorageError};

pub async fn wait_for_store(
    store: &dyn EventStore,
    attempts: u32,
    delay: Duration,
) -> Result<(), StorageError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match prepare(store).await {
            Ok(()) => {
                info!(attempt, "event store ready");
                return Ok(());
            }
            Err(err) if attempt < attempts => {
                warn!(
                    attempt,
                    attempts,
                    retry_in_ms = delay.as_millis() as u64,
                    "event store not ready: {}",
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

async fn prepare(store: &dyn EventStore) -> Result<(), StorageError> {
    store.ping().await?;
    store.ensure_schema().await
}
