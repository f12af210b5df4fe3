//! Sync status projection
//!
//! Observational only; nothing on the data path reads it.

use shared::models::SyncStatus;
use tokio::sync::watch;

#[derive(Debug)]
pub struct StatusTracker {
    tx: watch::Sender<SyncStatus>,
}

impl StatusTracker {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SyncStatus::default());
        Self { tx }
    }

    pub fn current(&self) -> SyncStatus {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.tx.subscribe()
    }

    /// Successful exchange with the channel
    pub fn mark_synced(&self, now: i64, pending_changes: u32) {
        self.tx.send_modify(|s| {
            s.is_online = true;
            s.last_sync = Some(now);
            s.pending_changes = pending_changes;
        });
    }

    pub fn mark_offline(&self, pending_changes: u32) {
        self.tx.send_modify(|s| {
            s.is_online = false;
            s.pending_changes = pending_changes;
        });
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
