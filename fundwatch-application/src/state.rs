use std::sync::Arc;

use fundwatch_domain::ports::EventStore;
use fundwatch_domain::{RuleEngine, RuntimeConfig};

use crate::ops::UserLocks;
use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub event_store: Arc<dyn EventStore>,
    pub engine: Arc<RuleEngine>,
    pub user_locks: Arc<UserLocks>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, event_store: Arc<dyn EventStore>) -> Self {
        let user_locks = Arc::new(UserLocks::new(config.serialize_per_user));
        Self {
            config,
            event_store,
            engine: Arc::new(RuleEngine::standard()),
            user_locks,
            metrics: Arc::new(Metrics::default()),
        }
    }
}
