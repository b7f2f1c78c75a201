use std::str::FromStr;

use rust_decimal::Decimal;

use fundwatch_domain::{EventType, NewEvent, SortOrder};

use crate::dtos::EventPayload;
use crate::AppError;

// Matches the Decimal128(18) column check: at most 18 fractional digits and
// 20 integer digits.
pub const MAX_AMOUNT_SCALE: u32 = 18;
pub const MAX_AMOUNT_INTEGER_DIGITS: u32 = 20;
// 10^20
pub const AMOUNT_UPPER_BOUND: Decimal =
    Decimal::from_parts(1_661_992_960, 1_808_227_885, 5, false, 0);

pub fn validate_event(payload: &EventPayload) -> Result<NewEvent, AppError> {
    let event_type = parse_event_type(&payload.event_type)?;
    let amount = parse_amount(&payload.amount)?;
    Ok(NewEvent::new(payload.user_id, event_type, amount, payload.t))
}

pub fn parse_event_type(raw: &str) -> Result<EventType, AppError> {
    raw.parse::<EventType>()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

pub fn parse_amount(raw: &str) -> Result<Decimal, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("amount is empty".to_string()));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| AppError::BadRequest(format!("amount '{}' is not a decimal", raw)))?;
    if amount <= Decimal::ZERO {
        return Err(AppError::BadRequest(format!(
            "amount must be positive, got '{}'",
            raw
        )));
    }
    if amount >= AMOUNT_UPPER_BOUND {
        return Err(AppError::BadRequest(format!(
            "amount '{}' has more than {} integer digits",
            raw, MAX_AMOUNT_INTEGER_DIGITS
        )));
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(AppError::BadRequest(format!(
            "amount '{}' has more than {} fractional digits",
            raw, MAX_AMOUNT_SCALE
        )));
    }
    Ok(amount)
}

pub fn parse_order(raw: &str) -> Result<SortOrder, AppError> {
    match raw.trim().to_lowercase().as_str() {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        other => Err(AppError::BadRequest(format!(
            "invalid order '{}', expected 'asc' or 'desc'",
            other
        ))),
    }
}
