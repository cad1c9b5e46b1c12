//! Per-project write serialization

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Hands out one async lock per project folder.
///
/// Holding the guard across a read-modify-write keeps other edits of the same
/// project in this process from interleaving with it. Locks nobody holds or
/// waits on are dropped on the next acquire, so the map only keeps projects
/// with edits in flight.
#[derive(Debug, Default)]
pub(crate) struct WriteGate {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl WriteGate {
    pub(crate) async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Only the map references an idle lock
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(key.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let gate = WriteGate::default();
        let guard = gate.acquire("/file/p/").await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), gate.acquire("/file/p/")).await;
        assert!(blocked.is_err());

        drop(guard);
        let reacquired =
            tokio::time::timeout(Duration::from_millis(50), gate.acquire("/file/p/")).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn test_different_keys_are_independent() {
        let gate = WriteGate::default();
        let _a = gate.acquire("/file/a/").await;
        let b = tokio::time::timeout(Duration::from_millis(50), gate.acquire("/file/b/")).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn test_released_locks_are_dropped() {
        let gate = WriteGate::default();
        for i in 0..10 {
            let _guard = gate.acquire(&format!("/file/p{i}/")).await;
        }
        let _held = gate.acquire("/file/held/").await;
        assert_eq!(gate.tracked(), 1);

        let _other = gate.acquire("/file/other/").await;
        assert_eq!(gate.tracked(), 2);
    }
}
