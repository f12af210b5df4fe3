//! Cross-context synchronization
//!
//! - [`SyncChannel`] / [`KvSyncChannel`] - publish/subscribe over the shared KV store
//! - [`EnvelopeCursor`] - last-applied key, Lamport-style local stamps
//! - [`SyncManager`] - broadcaster, push listener, reconciliation poller, heartbeat

mod channel;
mod cursor;
mod manager;
mod status;

pub use channel::{KvSyncChannel, PRESENCE_TOPIC, STATE_TOPIC, SyncChannel};
pub use cursor::EnvelopeCursor;
pub use manager::{DEFAULT_HEARTBEAT_INTERVAL, DEFAULT_POLL_INTERVAL, SyncManager, SyncSettings};
pub use status::StatusTracker;
