use axum::routing::{get, post};
use axum::Router;

use fundwatch_application::AppState;

use crate::handlers::{ingest_handlers, ops_handlers, query_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/event", post(ingest_handlers::submit_event))
        .route("/events", get(query_handlers::list_events))
        .route("/ops/health/live", get(ops_handlers::health_live))
        .route("/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
