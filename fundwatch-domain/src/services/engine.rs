use tracing::debug;

use crate::entities::UserEvent;
use crate::error::StorageError;
use crate::ports::EventStore;
use crate::services::rules::{
    ConsecutiveWithdrawsRule, DepositWindowRule, IncreasingDepositsRule, Rule,
    WithdrawThresholdRule,
};
use crate::value_objects::AlertCode;

pub struct RuleEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleEngine {
    pub fn standard() -> Self {
        Self::with_rules(vec![
            Box::new(WithdrawThresholdRule),
            Box::new(ConsecutiveWithdrawsRule),
            Box::new(IncreasingDepositsRule),
            Box::new(DepositWindowRule),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    #[cfg(test)]
    pub fn codes(&self) -> Vec<AlertCode> {
        self.rules.iter().map(|rule| rule.code()).collect()
    }
    pub async fn evaluate(
        &self,
        store: &dyn EventStore,
        event: &UserEvent,
        as_of: i64,
    ) -> Result<Vec<AlertCode>, StorageError> {
        let mut triggered = Vec::new();
        for rule in &self.rules {
            if rule.triggered(event, as_of, store).await? {
                debug!(
                    user_id = event.user_id,
                    event_id = %event.id,
                    rule = rule.code().as_str(),
                    "rule triggered"
                );
                triggered.push(rule.code());
            }
        }
        Ok(triggered)
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::standard()
    }
}
