//! In-process key-value store
//!
//! Clones share the same map and change feed, which is how several contexts
//! inside one process observe each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::broadcast;

use super::kv::{CHANGE_FEED_CAPACITY, KeyValueStore, KvError, KvResult};

#[derive(Clone)]
pub struct MemoryKv {
    entries: Arc<DashMap<String, String>>,
    changes: broadcast::Sender<String>,
    /// Simulated outage switch
    offline: Arc<AtomicBool>,
}

impl MemoryKv {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            entries: Arc::new(DashMap::new()),
            changes,
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent call fail until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_online(&self) -> KvResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

impl Default for MemoryKv {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        self.check_online()?;
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        self.check_online()?;
        self.entries.insert(key.to_string(), value);
        // No receivers is fine
        let _ = self.changes.send(key.to_string());
        Ok(())
    }

    fn watch(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_and_change_feed() {
        let kv = MemoryKv::new();
        let other = kv.clone();
        let mut feed = other.watch();

        assert_eq!(kv.get("adminConfig").await.unwrap(), None);
        kv.set("adminConfig", "{}".into()).await.unwrap();
        assert_eq!(other.get("adminConfig").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(feed.recv().await.unwrap(), "adminConfig");
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let kv = MemoryKv::new();
        kv.set_offline(true);
        assert!(matches!(kv.set("k", "v".into()).await, Err(KvError::Unavailable(_))));
        kv.set_offline(false);
        assert!(kv.set("k", "v".into()).await.is_ok());
        assert_eq!(kv.len(), 1);
    }
}
