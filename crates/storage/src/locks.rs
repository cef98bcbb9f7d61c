use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::repository::StorageError;

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// One async lock per storage key.
///
/// Serializes read-modify-write cycles on the same key inside this process.
/// Entries only live while someone holds or waits for them.
#[derive(Default)]
pub(crate) struct KeyLocks {
    locks: Mutex<LockMap>,
}

/// Held lock on one key. Dropping it releases the key and forgets it when no
/// other task is waiting.
pub(crate) struct KeyGuard<'a> {
    owner: &'a KeyLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyLocks {
    pub(crate) async fn acquire(&self, key: &str) -> Result<KeyGuard<'_>, StorageError> {
        let lock = {
            let mut map = self
                .locks
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            Arc::clone(map.entry(key.to_string()).or_default())
        };
        let guard = lock.lock_owned().await;
        Ok(KeyGuard {
            owner: self,
            key: key.to_string(),
            guard: Some(guard),
        })
    }

    /// Removes the entry for `key` if the map holds the only reference.
    ///
    /// Clones are only taken under the map lock, so a count of one means no
    /// task holds or awaits this key.
    fn release(&self, key: &str) {
        let Ok(mut map) = self.locks.lock() else {
            return;
        };
        if map.get(key).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(key);
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().map(|map| map.len()).unwrap_or_default()
    }
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.owner.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn entries_are_forgotten_once_guards_drop() {
        let locks = KeyLocks::default();
        for i in 0..10_000 {
            let guard = locks.acquire(&format!("data_student{i}_BTM")).await.unwrap();
            drop(guard);
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn waiting_task_keeps_the_entry_until_it_finishes() {
        let locks = Arc::new(KeyLocks::default());
        let first = locks.acquire("k").await.unwrap();

        let waiter = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                let _guard = locks.acquire("k").await.unwrap();
                tokio::time::sleep(Duration::from_millis(10)).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        drop(first);
        assert_eq!(locks.len(), 1);

        waiter.await.unwrap();
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_block_each_other() {
        let locks = KeyLocks::default();
        let _a = locks.acquire("a").await.unwrap();
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire("b")).await;
        assert!(b.is_ok());
        assert_eq!(locks.len(), 2);
    }
}
