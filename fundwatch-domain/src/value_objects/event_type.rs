// Event type value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Deposit,
    Withdraw,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Deposit => "deposit",
            EventType::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid event type '{0}', expected 'deposit' or 'withdraw'")]
pub struct ParseEventTypeError(pub String);

impl FromStr for EventType {
    type Err = ParseEventTypeError;

    // Exact match only: the stored column and the wire format share these literals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(EventType::Deposit),
            "withdraw" => Ok(EventType::Withdraw),
            other => Err(ParseEventTypeError(other.to_string())),
        }
    }
}
