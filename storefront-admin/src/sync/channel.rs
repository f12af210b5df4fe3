//! Shared sync channel
//!
//! A topic is one well-known key in the shared key-value store holding the
//! most recent envelope. Writers announce through the store's change feed;
//! readers can always re-read the key (reconciliation tick).

use std::sync::Arc;

use async_trait::async_trait;
use shared::models::SyncEnvelope;
use shared::{AppError, AppResult};
use tokio::sync::broadcast;

use crate::persistence::KeyValueStore;

/// Topic carrying configuration snapshots
pub const STATE_TOPIC: &str = "admin_sync_channel";

/// Topic carrying heartbeats (kept apart so heartbeats never overwrite state)
pub const PRESENCE_TOPIC: &str = "admin_presence";

#[async_trait]
pub trait SyncChannel: Send + Sync {
    /// Publish an envelope. Returns false when the topic already holds a
    /// newer envelope, in which case nothing is written.
    async fn publish(&self, topic: &str, envelope: &SyncEnvelope) -> AppResult<bool>;

    /// Most recent envelope on a topic
    async fn latest(&self, topic: &str) -> AppResult<Option<SyncEnvelope>>;

    /// Feed of topics that were just written
    fn subscribe(&self) -> broadcast::Receiver<String>;
}

/// Sync channel over a shared [`KeyValueStore`]
#[derive(Clone)]
pub struct KvSyncChannel {
    kv: Arc<dyn KeyValueStore>,
}

impl KvSyncChannel {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl SyncChannel for KvSyncChannel {
    async fn publish(&self, topic: &str, envelope: &SyncEnvelope) -> AppResult<bool> {
        if let Ok(Some(current)) = self.latest(topic).await
            && current.key() > envelope.key()
        {
            return Ok(false);
        }
        let raw = envelope.to_json()?;
        self.kv
            .set(topic, raw)
            .await
            .map_err(|e| AppError::sync(format!("publish to {topic} failed: {e}")))?;
        Ok(true)
    }

    async fn latest(&self, topic: &str) -> AppResult<Option<SyncEnvelope>> {
        let raw = self
            .kv
            .get(topic)
            .await
            .map_err(|e| AppError::sync(format!("read of {topic} failed: {e}")))?;
        match raw {
            Some(raw) => Ok(Some(SyncEnvelope::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<String> {
        self.kv.watch()
    }
}
