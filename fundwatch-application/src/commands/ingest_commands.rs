use tokio::time::{timeout_at, Instant};
use tracing::{error, info, warn};

use fundwatch_domain::StorageError;

use crate::dtos::{EventPayload, EventResponse};
use crate::validation::validate_event;
use crate::AppError;
use crate::AppState;

/// A failure after the append is reported as [`AppError::Evaluation`]; the
/// event is already durable. Evaluation stops at the ingest budget so the
/// caller still learns the event id.
pub async fn submit_event(
    state: &AppState,
    payload: EventPayload,
) -> Result<EventResponse, AppError> {
    state.metrics.record_request();
    let budget = state.config.ingest_budget();
    let deadline = Instant::now() + budget;

    let event = validate_event(&payload).map_err(|err| {
        warn!(user_id = payload.user_id, "rejected event: {}", err);
        state.metrics.record_rejected();
        err
    })?;

    let _user_guard = state.user_locks.acquire(event.user_id).await;

    let stored = state.event_store.append(&event).await.map_err(|err| {
        error!(user_id = event.user_id, "failed to store event: {}", err);
        state.metrics.record_ingest_error();
        AppError::Storage(err)
    })?;
    state.metrics.record_stored();

    let evaluation = timeout_at(
        deadline,
        state
            .engine
            .evaluate(state.event_store.as_ref(), &stored, stored.timestamp),
    )
    .await
    .unwrap_or(Err(StorageError::Timeout(budget)));
    let codes = evaluation.map_err(|err| {
        error!(
            user_id = stored.user_id,
            event_id = %stored.id,
            "event stored but rule evaluation failed: {}",
            err
        );
        state.metrics.record_evaluation_error();
        AppError::Evaluation {
            event_id: stored.id.clone(),
            source: err,
        }
    })?;

    if !codes.is_empty() {
        let code_list: Vec<u16> = codes.iter().map(|code| code.code()).collect();
        info!(
            user_id = stored.user_id,
            event_id = %stored.id,
            codes = ?code_list,
            "alerts triggered"
        );
        state.metrics.record_alerts(&codes);
    }

    Ok(EventResponse::new(stored.user_id, codes))
}
