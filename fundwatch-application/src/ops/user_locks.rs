use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

const PRUNE_THRESHOLD: usize = 1024;

#[derive(Default)]
pub struct UserLocks {
    enabled: bool,
    locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }
    pub async fn acquire(&self, user_id: i64) -> Option<OwnedMutexGuard<()>> {
        if !self.enabled {
            return None;
        }
        let lock = {
            let mut locks = self.locks.lock().await;
            if locks.len() >= PRUNE_THRESHOLD {
                // Unused entries are only referenced by the map itself.
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }
            locks.entry(user_id).or_default().clone()
        };
        Some(lock.lock_owned().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn disabled_locks_never_block() {
        let locks = UserLocks::new(false);
        assert!(locks.acquire(1).await.is_none());
        assert!(locks.acquire(1).await.is_none());
    }

    #[tokio::test]
    async fn same_user_waits_for_holder() {
        let locks = UserLocks::new(true);
        let guard = locks.acquire(1).await.expect("enabled");

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire(1)).await;
        assert!(blocked.is_err());

        let other_user = tokio::time::timeout(Duration::from_millis(50), locks.acquire(2)).await;
        assert!(matches!(other_user, Ok(Some(_))));

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.acquire(1)).await;
        assert!(matches!(reacquired, Ok(Some(_))));
    }
}
