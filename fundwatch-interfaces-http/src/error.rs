use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use fundwatch_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    Internal(String),
    EvaluationFailed { event_id: String, message: String },
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        match value {
            AppError::BadRequest(msg) => HttpError::BadRequest(msg),
            AppError::Storage(err) => HttpError::Internal(err.to_string()),
            AppError::Evaluation { event_id, source } => HttpError::EvaluationFailed {
                message: format!(
                    "event was stored but rule evaluation failed: {}",
                    source
                ),
                event_id: event_id.0,
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_saved: Option<bool>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            HttpError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: format!("bad request: {}", msg),
                    event_id: None,
                    event_saved: None,
                },
            ),
            HttpError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: msg,
                    event_id: None,
                    event_saved: None,
                },
            ),
            HttpError::EvaluationFailed { event_id, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: message,
                    event_id: Some(event_id),
                    event_saved: Some(true),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}
