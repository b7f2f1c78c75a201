use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::entities::{EventQuery, SortOrder, UserEvent};
use crate::error::StorageError;
use crate::ports::EventStore;
use crate::value_objects::{AlertCode, EventType};

pub const WITHDRAW_THRESHOLD: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
pub const CONSECUTIVE_WITHDRAWS: usize = 3;
pub const INCREASING_DEPOSIT_RUN: usize = 3;
pub const DEPOSIT_WINDOW: i64 = 30;
pub const DEPOSIT_WINDOW_LIMIT: Decimal = Decimal::from_parts(200, 0, 0, false, 0);

// History-dependent rules only look at events with `timestamp <= as_of`.
#[async_trait]
pub trait Rule: Send + Sync {
    fn code(&self) -> AlertCode;

    async fn triggered(
        &self,
        event: &UserEvent,
        as_of: i64,
        store: &dyn EventStore,
    ) -> Result<bool, StorageError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WithdrawThresholdRule;

#[async_trait]
impl Rule for WithdrawThresholdRule {
    fn code(&self) -> AlertCode {
        AlertCode::WithdrawOver100
    }

    async fn triggered(
        &self,
        event: &UserEvent,
        _as_of: i64,
        _store: &dyn EventStore,
    ) -> Result<bool, StorageError> {
        Ok(exceeds_withdraw_threshold(event.event_type, event.amount))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsecutiveWithdrawsRule;

#[async_trait]
impl Rule for ConsecutiveWithdrawsRule {
    fn code(&self) -> AlertCode {
        AlertCode::ThreeConsecutiveWithdraws
    }

    async fn triggered(
        &self,
        event: &UserEvent,
        as_of: i64,
        store: &dyn EventStore,
    ) -> Result<bool, StorageError> {
        let query = EventQuery::for_user(event.user_id)
            .until(as_of)
            .order(SortOrder::Desc)
            .limit(CONSECUTIVE_WITHDRAWS);
        let latest = store.query(&query).await?;
        Ok(is_withdraw_streak(&latest))
    }
}

// Scans the whole deposit history up to `as_of`.
#[derive(Debug, Default, Clone, Copy)]
pub struct IncreasingDepositsRule;

#[async_trait]
impl Rule for IncreasingDepositsRule {
    fn code(&self) -> AlertCode {
        AlertCode::ThreeConsecutiveIncreasingDeposits
    }

    async fn triggered(
        &self,
        event: &UserEvent,
        as_of: i64,
        store: &dyn EventStore,
    ) -> Result<bool, StorageError> {
        let query = EventQuery::for_user(event.user_id)
            .of_type(EventType::Deposit)
            .until(as_of)
            .order(SortOrder::Asc);
        let deposits = store.query(&query).await?;
        let amounts: Vec<Decimal> = deposits.iter().map(|deposit| deposit.amount).collect();
        Ok(has_increasing_run(&amounts))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DepositWindowRule;

#[async_trait]
impl Rule for DepositWindowRule {
    fn code(&self) -> AlertCode {
        AlertCode::AccumulativeDepositOver200
    }

    async fn triggered(
        &self,
        event: &UserEvent,
        as_of: i64,
        store: &dyn EventStore,
    ) -> Result<bool, StorageError> {
        let query = EventQuery::for_user(event.user_id)
            .of_type(EventType::Deposit)
            .from(as_of.saturating_sub(DEPOSIT_WINDOW))
            .until(as_of);
        let deposits = store.query(&query).await?;
        Ok(sum_amounts(&deposits) > DEPOSIT_WINDOW_LIMIT)
    }
}

pub fn exceeds_withdraw_threshold(event_type: EventType, amount: Decimal) -> bool {
    event_type == EventType::Withdraw && amount > WITHDRAW_THRESHOLD
}

// Expects the latest events, newest first, already limited to the streak length.
pub fn is_withdraw_streak(latest: &[UserEvent]) -> bool {
    latest.len() == CONSECUTIVE_WITHDRAWS && latest.iter().all(UserEvent::is_withdraw)
}

pub fn has_increasing_run(amounts: &[Decimal]) -> bool {
    amounts
        .windows(INCREASING_DEPOSIT_RUN)
        .any(|run| run.windows(2).all(|pair| pair[0] < pair[1]))
}

// Saturates at `Decimal::MAX`, which is already far over any window limit.
pub fn sum_amounts(events: &[UserEvent]) -> Decimal {
    events.iter().fold(Decimal::ZERO, |total, event| {
        total.checked_add(event.amount).unwrap_or(Decimal::MAX)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{in_flight, FixedStore};
    use rust_decimal_macros::dec;

    use EventType::{Deposit, Withdraw};

    #[test]
    fn threshold_constants() {
        assert_eq!(WITHDRAW_THRESHOLD, dec!(100));
        assert_eq!(DEPOSIT_WINDOW_LIMIT, dec!(200));
    }

    #[tokio::test]
    async fn withdraw_threshold_is_strict() {
        let store = FixedStore::default();
        let rule = WithdrawThresholdRule;

        let at_limit = in_flight(Withdraw, dec!(100), 10);
        assert!(!rule.triggered(&at_limit, 10, &store).await.unwrap());

        let over = in_flight(Withdraw, dec!(100.01), 10);
        assert!(rule.triggered(&over, 10, &store).await.unwrap());
    }

    #[tokio::test]
    async fn withdraw_threshold_ignores_deposits_and_history() {
        let store = FixedStore::failing();
        let deposit = in_flight(Deposit, dec!(5000), 10);
        assert!(!WithdrawThresholdRule
            .triggered(&deposit, 10, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn three_withdraws_trigger() {
        let store = FixedStore::with(vec![
            (Withdraw, dec!(50), 10),
            (Withdraw, dec!(60), 20),
            (Withdraw, dec!(70), 30),
        ]);
        let current = in_flight(Withdraw, dec!(70), 30);
        assert!(ConsecutiveWithdrawsRule
            .triggered(&current, 30, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn interleaved_deposit_breaks_withdraw_streak() {
        let store = FixedStore::with(vec![
            (Withdraw, dec!(50), 10),
            (Withdraw, dec!(60), 20),
            (Deposit, dec!(5), 25),
            (Withdraw, dec!(70), 30),
        ]);
        let current = in_flight(Withdraw, dec!(70), 30);
        assert!(!ConsecutiveWithdrawsRule
            .triggered(&current, 30, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn fewer_than_three_events_never_streak() {
        let store = FixedStore::with(vec![(Withdraw, dec!(50), 10), (Withdraw, dec!(60), 20)]);
        let current = in_flight(Withdraw, dec!(60), 20);
        assert!(!ConsecutiveWithdrawsRule
            .triggered(&current, 20, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn later_events_are_outside_the_horizon() {
        // A deposit after as_of must not break an earlier streak.
        let store = FixedStore::with(vec![
            (Withdraw, dec!(50), 10),
            (Withdraw, dec!(60), 20),
            (Withdraw, dec!(70), 30),
            (Deposit, dec!(5), 40),
        ]);
        let current = in_flight(Withdraw, dec!(70), 30);
        assert!(ConsecutiveWithdrawsRule
            .triggered(&current, 30, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn events_sharing_as_of_are_inside_the_horizon() {
        let store = FixedStore::with(vec![
            (Withdraw, dec!(50), 10),
            (Withdraw, dec!(60), 30),
            (Withdraw, dec!(70), 30),
        ]);
        let current = in_flight(Withdraw, dec!(70), 30);
        assert!(ConsecutiveWithdrawsRule
            .triggered(&current, 30, &store)
            .await
            .unwrap());
    }

    #[test]
    fn increasing_run_detection() {
        assert!(has_increasing_run(&[dec!(50), dec!(100), dec!(150)]));
        assert!(!has_increasing_run(&[dec!(150), dec!(100), dec!(50)]));
        assert!(has_increasing_run(&[dec!(50), dec!(60), dec!(55), dec!(70), dec!(90)]));
        assert!(!has_increasing_run(&[dec!(50), dec!(50), dec!(60)]));
        assert!(!has_increasing_run(&[dec!(50), dec!(60)]));
        assert!(!has_increasing_run(&[]));
    }

    #[tokio::test]
    async fn increasing_deposits_scan_whole_history() {
        let store = FixedStore::with(vec![
            (Deposit, dec!(50), 10),
            (Deposit, dec!(60), 20),
            (Deposit, dec!(55), 30),
            (Withdraw, dec!(500), 35),
            (Deposit, dec!(70), 40),
            (Deposit, dec!(90), 50),
        ]);
        let current = in_flight(Deposit, dec!(90), 50);
        assert!(IncreasingDepositsRule
            .triggered(&current, 50, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn increasing_deposits_order_by_timestamp_not_insertion() {
        // Inserted out of order; by timestamp the amounts are 150, 100, 50.
        let store = FixedStore::with(vec![
            (Deposit, dec!(50), 30),
            (Deposit, dec!(150), 10),
            (Deposit, dec!(100), 20),
        ]);
        let current = in_flight(Deposit, dec!(50), 30);
        assert!(!IncreasingDepositsRule
            .triggered(&current, 30, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn deposit_window_sum_is_strict() {
        let store = FixedStore::with(vec![(Deposit, dec!(100), 10), (Deposit, dec!(100), 20)]);
        let current = in_flight(Deposit, dec!(100), 20);
        assert!(!DepositWindowRule
            .triggered(&current, 20, &store)
            .await
            .unwrap());

        let store = FixedStore::with(vec![(Deposit, dec!(100), 10), (Deposit, dec!(100.01), 20)]);
        assert!(DepositWindowRule
            .triggered(&current, 20, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn deposit_window_saturates_instead_of_overflowing() {
        let huge = Decimal::MAX - dec!(1);
        let store = FixedStore::with(vec![(Deposit, huge, 10), (Deposit, huge, 20)]);
        let current = in_flight(Deposit, huge, 20);
        assert!(DepositWindowRule
            .triggered(&current, 20, &store)
            .await
            .unwrap());
    }

    #[test]
    fn sum_amounts_saturates() {
        let events = vec![
            in_flight(Deposit, Decimal::MAX, 1),
            in_flight(Deposit, Decimal::MAX, 2),
        ];
        assert_eq!(sum_amounts(&events), Decimal::MAX);
        assert_eq!(sum_amounts(&[]), Decimal::ZERO);
    }

    #[tokio::test]
    async fn deposit_window_bounds() {
        // as_of = 40: t=9 is as_of - 31 (excluded), t=10 is as_of - 30 (included).
        let store = FixedStore::with(vec![
            (Deposit, dec!(150), 9),
            (Deposit, dec!(100), 10),
            (Deposit, dec!(90), 40),
        ]);
        let current = in_flight(Deposit, dec!(90), 40);
        assert!(!DepositWindowRule
            .triggered(&current, 40, &store)
            .await
            .unwrap());

        let store = FixedStore::with(vec![
            (Deposit, dec!(100), 10),
            (Deposit, dec!(150), 20),
        ]);
        let current = in_flight(Deposit, dec!(150), 40);
        assert!(DepositWindowRule
            .triggered(&current, 40, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn deposit_window_ignores_withdrawals() {
        let store = FixedStore::with(vec![(Withdraw, dec!(500), 10), (Deposit, dec!(150), 20)]);
        let current = in_flight(Deposit, dec!(150), 20);
        assert!(!DepositWindowRule
            .triggered(&current, 20, &store)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn empty_history_triggers_nothing() {
        let store = FixedStore::default();
        let current = in_flight(Deposit, dec!(10), 10);
        assert!(!ConsecutiveWithdrawsRule.triggered(&current, 10, &store).await.unwrap());
        assert!(!IncreasingDepositsRule.triggered(&current, 10, &store).await.unwrap());
        assert!(!DepositWindowRule.triggered(&current, 10, &store).await.unwrap());
    }

    #[tokio::test]
    async fn history_rules_surface_storage_errors() {
        let store = FixedStore::failing();
        let current = in_flight(Deposit, dec!(10), 10);
        let err = DepositWindowRule
            .triggered(&current, 10, &store)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Connection(_)));
    }
}
