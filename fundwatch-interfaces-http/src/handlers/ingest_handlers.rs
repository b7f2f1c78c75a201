use axum::extract::State;
use axum::Json;

use fundwatch_application::commands::ingest_commands;
use fundwatch_application::dtos::{EventPayload, EventResponse};
use fundwatch_application::AppState;

use crate::error::HttpError;

pub async fn submit_event(
    State(state): State<AppState>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<EventResponse>, HttpError> {
    let response = ingest_commands::submit_event(&state, payload).await?;
    Ok(Json(response))
}
