//! SyncManager - keeps browsing contexts of one client eventually consistent
//!
//! # Paths
//!
//! ```text
//! local change ──► stamp (dispatch lock) ──► broadcaster ──► publish(admin_sync_channel) ──┐
//!                                                                 │ shared KV
//! remote change ◄── apply_remote ◄── handle_envelope ◄── listener (push, change feed)
//!                                                    ◄── poller   (reconciliation tick)
//! heartbeat timer ──► publish(admin_presence) ──► SyncStatus
//! ```
//!
//! Conflict policy is last-write-wins on the envelope key `(timestamp, source)`.
//! Local envelopes are stamped while the store applies the change, and remote
//! envelopes are admitted under the same lock, so stamp order equals apply order.
//! A failed publish marks the context offline and keeps the envelope pending;
//! the next poll tick retries it.

use std::sync::{Arc, Weak};
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use shared::models::{ConfigSnapshot, Heartbeat, SyncBody, SyncEnvelope, SyncStatus};
use shared::util::now_millis;
use tokio::sync::{Notify, broadcast, watch};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::channel::{PRESENCE_TOPIC, STATE_TOPIC, SyncChannel};
use super::cursor::EnvelopeCursor;
use super::status::StatusTracker;
use crate::core::{BackgroundTasks, TaskKind};
use crate::store::{AdminStore, ChangeOrigin, StateChange, StoreObserver};

/// Default reconciliation poll period
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default heartbeat period
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// This context's id, used as envelope source
    pub context_id: String,
    pub poll_interval: Duration,
    pub heartbeat_interval: Duration,
}

impl SyncSettings {
    pub fn new(context_id: impl Into<String>) -> Self {
        Self {
            context_id: context_id.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
        }
    }
}

struct SyncInner {
    settings: SyncSettings,
    store: AdminStore,
    channel: Arc<dyn SyncChannel>,
    cursor: Mutex<EnvelopeCursor>,
    /// Latest unpublished state envelope (newer snapshots supersede older ones)
    pending: Mutex<Option<SyncEnvelope>>,
    /// Local changes not yet published
    pending_changes: AtomicU32,
    /// Wakes the broadcaster when a new envelope is staged
    outbound: Notify,
    status: StatusTracker,
}

/// 在 store 应用本地变更的同时打上时间戳
struct LocalChangeStamper {
    inner: Weak<SyncInner>,
}

impl StoreObserver for LocalChangeStamper {
    fn on_change(&self, change: &StateChange) {
        // Remote changes are never rebroadcast
        if change.origin != ChangeOrigin::Local || !change.config_changed() {
            return;
        }
        if let Some(inner) = self.inner.upgrade() {
            let manager = SyncManager { inner };
            manager.stage(&change.state.config);
            manager.inner.outbound.notify_one();
        }
    }
}

#[derive(Clone)]
pub struct SyncManager {
    inner: Arc<SyncInner>,
}

impl SyncManager {
    pub fn new(store: AdminStore, channel: Arc<dyn SyncChannel>, settings: SyncSettings) -> Self {
        Self {
            inner: Arc::new(SyncInner {
                settings,
                store,
                channel,
                cursor: Mutex::new(EnvelopeCursor::new()),
                pending: Mutex::new(None),
                pending_changes: AtomicU32::new(0),
                outbound: Notify::new(),
                status: StatusTracker::new(),
            }),
        }
    }

    pub fn context_id(&self) -> &str {
        &self.inner.settings.context_id
    }

    pub fn status(&self) -> SyncStatus {
        self.inner.status.current()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.inner.status.subscribe()
    }

    fn pending_count(&self) -> u32 {
        self.inner.pending_changes.load(Ordering::SeqCst)
    }

    /// Observe the store, then register the broadcaster, the push listener,
    /// the reconciliation poller and the heartbeat with `tasks`.
    /// All four stop on `tasks.shutdown()`; unsent local changes are flushed first.
    pub async fn start(&self, tasks: &mut BackgroundTasks) {
        self.attach();
        self.prime().await;

        let token = tasks.shutdown_token();
        tasks.spawn(
            "sync_broadcaster",
            TaskKind::Worker,
            self.clone().run_broadcaster(token.clone()),
        );
        // Subscribe before spawning so no write between now and the first poll is missed
        let feed = self.inner.channel.subscribe();
        tasks.spawn(
            "sync_listener",
            TaskKind::Listener,
            self.clone().run_listener(feed, token.clone()),
        );
        tasks.spawn("sync_poller", TaskKind::Periodic, self.clone().run_poller(token.clone()));
        tasks.spawn("sync_heartbeat", TaskKind::Periodic, self.clone().run_heartbeat(token));

        tracing::info!(
            context_id = %self.context_id(),
            poll_ms = self.inner.settings.poll_interval.as_millis() as u64,
            heartbeat_ms = self.inner.settings.heartbeat_interval.as_millis() as u64,
            "SyncManager started"
        );
    }

    /// Record the channel's current envelope as seen without applying it.
    /// The startup state came from persistence, which is at least as new.
    async fn prime(&self) {
        match self.inner.channel.latest(STATE_TOPIC).await {
            Ok(Some(envelope)) => {
                self.inner.cursor.lock().accept(&envelope.key());
                self.inner.status.mark_synced(now_millis(), self.pending_count());
            }
            Ok(None) => self.inner.status.mark_synced(now_millis(), self.pending_count()),
            Err(e) => {
                tracing::warn!(error = %e, "Sync channel unreachable at startup");
                self.inner.status.mark_offline(self.pending_count());
            }
        }
    }

    /// Store holds the stamper weakly
    fn attach(&self) {
        self.inner.store.add_observer(Arc::new(LocalChangeStamper {
            inner: Arc::downgrade(&self.inner),
        }));
    }

    // ========== Outbound ==========

    /// Stamp the snapshot and make it the pending envelope
    fn stage(&self, config: &ConfigSnapshot) {
        let timestamp = self.inner.cursor.lock().stamp(self.context_id(), now_millis());
        let envelope = SyncEnvelope::new(
            self.context_id(),
            timestamp,
            SyncBody::StateUpdate(config.clone()),
        );
        self.inner.pending_changes.fetch_add(1, Ordering::SeqCst);
        *self.inner.pending.lock() = Some(envelope);
    }

    /// Wrap the snapshot in a state envelope and publish it.
    /// Store changes are staged automatically once the manager is started.
    pub async fn broadcast_state(&self, config: &ConfigSnapshot) {
        self.stage(config);
        self.flush_pending().await;
    }

    /// Publish the pending envelope, if any. Returns true when nothing is left pending.
    pub async fn flush_pending(&self) -> bool {
        let pending = self.inner.pending.lock().clone();
        let Some(envelope) = pending else {
            return true;
        };

        match self.inner.channel.publish(STATE_TOPIC, &envelope).await {
            Ok(written) => {
                if !written {
                    tracing::debug!(envelope = %envelope, "Pending envelope superseded by a newer one");
                }
                {
                    let mut pending = self.inner.pending.lock();
                    if pending.as_ref().is_some_and(|p| p.key() == envelope.key()) {
                        *pending = None;
                    }
                }
                self.inner.pending_changes.store(0, Ordering::SeqCst);
                self.inner.status.mark_synced(now_millis(), 0);
                tracing::debug!(envelope = %envelope, "State envelope published");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, envelope = %envelope, "Publish failed, will retry");
                self.inner.status.mark_offline(self.pending_count());
                false
            }
        }
    }

    pub async fn send_heartbeat(&self) {
        let pending = self.pending_count();
        let envelope = SyncEnvelope::new(
            self.context_id(),
            now_millis(),
            SyncBody::Heartbeat(Heartbeat {
                online: true,
                pending_changes: pending,
            }),
        );
        match self.inner.channel.publish(PRESENCE_TOPIC, &envelope).await {
            Ok(_) => self.inner.status.mark_synced(now_millis(), pending),
            Err(e) => {
                tracing::warn!(error = %e, "Heartbeat failed");
                self.inner.status.mark_offline(pending);
            }
        }
    }

    // ========== Inbound ==========

    /// Apply an envelope received from the channel.
    /// Returns true when it changed this context's configuration.
    pub fn handle_envelope(&self, envelope: SyncEnvelope) -> bool {
        if envelope.source == self.context_id() {
            return false;
        }

        let key = envelope.key();
        match envelope.body {
            SyncBody::StateUpdate(snapshot) => {
                let applied = self.inner.store.apply_remote_if(snapshot, || {
                    if !self.inner.cursor.lock().accept(&key) {
                        return false;
                    }
                    // 已接受的 key 大于任何本地盖过的戳, 未发送的本地快照作废
                    if let Some(superseded) = self.inner.pending.lock().take() {
                        tracing::info!(envelope = %superseded, "Unsent local envelope superseded by remote");
                        self.inner.pending_changes.store(0, Ordering::SeqCst);
                    }
                    true
                });
                if applied.is_none() {
                    tracing::trace!(timestamp = key.timestamp, source = %key.source, "Stale envelope ignored");
                    return false;
                }
                tracing::info!(
                    timestamp = key.timestamp,
                    source = %key.source,
                    "Applied remote configuration"
                );
                self.inner.status.mark_synced(now_millis(), self.pending_count());
                true
            }
            SyncBody::Heartbeat(heartbeat) => {
                tracing::trace!(source = %envelope.source, online = heartbeat.online, "Heartbeat received");
                self.inner.status.mark_synced(now_millis(), self.pending_count());
                false
            }
        }
    }

    /// Re-read a topic and apply whatever it holds
    pub async fn reconcile(&self, topic: &str) -> bool {
        match self.inner.channel.latest(topic).await {
            Ok(Some(envelope)) => self.handle_envelope(envelope),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, topic, "Channel read failed");
                self.inner.status.mark_offline(self.pending_count());
                false
            }
        }
    }

    // ========== Tasks ==========

    async fn run_broadcaster(self, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = self.inner.outbound.notified() => {
                    self.flush_pending().await;
                }
            }
        }
        // A change staged right before shutdown still goes out
        if !self.flush_pending().await {
            tracing::warn!(pending = self.pending_count(), "Sync broadcaster stopped with unsent changes");
        }
        tracing::debug!("Sync broadcaster stopped");
    }

    async fn run_listener(self, mut feed: broadcast::Receiver<String>, token: CancellationToken) {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                result = feed.recv() => match result {
                    Ok(topic) if topic == STATE_TOPIC || topic == PRESENCE_TOPIC => {
                        self.reconcile(&topic).await;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Sync listener lagged, reconciling");
                        self.reconcile(STATE_TOPIC).await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Change feed closed, sync listener stopping");
                        break;
                    }
                }
            }
        }
        tracing::debug!("Sync listener stopped");
    }

    async fn run_poller(self, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.inner.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => {
                    self.flush_pending().await;
                    self.reconcile(STATE_TOPIC).await;
                }
            }
        }
        tracing::debug!("Sync poller stopped");
    }

    async fn run_heartbeat(self, token: CancellationToken) {
        let mut interval = tokio::time::interval(self.inner.settings.heartbeat_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = interval.tick() => self.send_heartbeat().await,
            }
        }
        tracing::debug!("Sync heartbeat stopped");
    }
}
