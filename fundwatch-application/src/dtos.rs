// Request and response shapes shared by the interface layers

use serde::{Deserialize, Serialize};

use fundwatch_domain::AlertCode;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventPayload {
    #[serde(rename = "type")]
    pub event_type: String,
    pub amount: String,
    pub user_id: i64,
    pub t: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventResponse {
    pub alert: bool,
    pub alert_codes: Vec<AlertCode>,
    pub user_id: i64,
}

impl EventResponse {
    pub fn new(user_id: i64, alert_codes: Vec<AlertCode>) -> Self {
        Self {
            alert: !alert_codes.is_empty(),
            alert_codes,
            user_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventHistoryQuery {
    pub user_id: i64,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub order: Option<String>,
    pub limit: Option<usize>,
}
