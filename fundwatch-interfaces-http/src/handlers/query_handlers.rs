use axum::extract::{Query, State};
use axum::Json;

use fundwatch_application::dtos::EventHistoryQuery;
use fundwatch_application::queries::event_queries;
use fundwatch_application::AppState;
use fundwatch_domain::UserEvent;

use crate::error::HttpError;

pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventHistoryQuery>,
) -> Result<Json<Vec<UserEvent>>, HttpError> {
    let events = event_queries::list_user_events(&state, query).await?;
    Ok(Json(events))
}
