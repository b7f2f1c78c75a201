// Event store query description

use serde::{Deserialize, Serialize};

use crate::entities::UserEvent;
use crate::value_objects::EventType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

// Timestamp bounds are inclusive. Ties on `timestamp` are broken by id in the
// same direction, so DESC is the exact reverse of ASC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub user_id: i64,
    pub event_type: Option<EventType>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

impl EventQuery {
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id,
            event_type: None,
            from: None,
            to: None,
            order: SortOrder::Asc,
            limit: None,
        }
    }

    pub fn of_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn from(mut self, from: i64) -> Self {
        self.from = Some(from);
        self
    }

    pub fn until(mut self, to: i64) -> Self {
        self.to = Some(to);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, event: &UserEvent) -> bool {
        if event.user_id != self.user_id {
            return false;
        }
        if let Some(event_type) = self.event_type {
            if event.event_type != event_type {
                return false;
            }
        }
        if let Some(from) = self.from {
            if event.timestamp < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if event.timestamp > to {
                return false;
            }
        }
        true
    }

    pub fn arrange(&self, mut events: Vec<UserEvent>) -> Vec<UserEvent> {
        events.sort_by(|a, b| (a.timestamp, &a.id).cmp(&(b.timestamp, &b.id)));
        if self.order == SortOrder::Desc {
            events.reverse();
        }
        if let Some(limit) = self.limit {
            events.truncate(limit);
        }
        events
    }
}
