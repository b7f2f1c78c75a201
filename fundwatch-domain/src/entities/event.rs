// Event entity
// Represents a single deposit or withdrawal for a user

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::value_objects::{EventId, EventType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub user_id: i64,
    pub event_type: EventType,
    pub amount: Decimal,
    pub timestamp: i64,
}

impl NewEvent {
    pub fn new(user_id: i64, event_type: EventType, amount: Decimal, timestamp: i64) -> Self {
        Self {
            user_id,
            event_type,
            amount,
            timestamp,
        }
    }

    pub fn into_stored(self, id: EventId) -> UserEvent {
        UserEvent {
            id,
            user_id: self.user_id,
            event_type: self.event_type,
            amount: self.amount,
            timestamp: self.timestamp,
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEvent {
    pub id: EventId,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub amount: Decimal,
    pub timestamp: i64,
}

impl UserEvent {
    pub fn is_deposit(&self) -> bool {
        self.event_type == EventType::Deposit
    }

    pub fn is_withdraw(&self) -> bool {
        self.event_type == EventType::Withdraw
    }
}
