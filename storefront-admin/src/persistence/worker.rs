//! PersistenceWorker - writes the configuration back after every change
//!
//! Receives store changes through a [`ChannelObserver`], debounces bursts and
//! saves the latest full snapshot. A burst that never pauses is still saved
//! once it has been pending for `MAX_WAIT_FACTOR` debounce windows. Write failures are logged and surfaced as
//! error notifications; the in-memory store stays authoritative.
//!
//! [`ChannelObserver`]: crate::store::ChannelObserver

use std::sync::Arc;

use shared::models::{ConfigSnapshot, Section};
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use super::bridge::PersistenceBridge;
use crate::store::{AdminStore, StateChange};

/// Longest a pending snapshot waits, in debounce windows
pub const MAX_WAIT_FACTOR: u32 = 10;

pub struct PersistenceWorker {
    store: AdminStore,
    bridge: PersistenceBridge,
    changes: mpsc::UnboundedReceiver<StateChange>,
    debounce: Duration,
    shutdown: CancellationToken,
}

impl PersistenceWorker {
    pub fn new(
        store: AdminStore,
        bridge: PersistenceBridge,
        changes: mpsc::UnboundedReceiver<StateChange>,
        debounce: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            bridge,
            changes,
            debounce,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(debounce_ms = self.debounce.as_millis() as u64, "PersistenceWorker started");

        let mut pending: Option<Arc<ConfigSnapshot>> = None;
        let mut deadline: Option<Instant> = None;
        // 第一个未保存变更的截止时间, 之后的变更不再推迟它
        let mut latest_allowed: Option<Instant> = None;
        let max_wait = self.debounce.saturating_mul(MAX_WAIT_FACTOR);

        loop {
            let sleep_until = deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("PersistenceWorker shutting down");
                    // Changes already queued by the store still count
                    while let Ok(change) = self.changes.try_recv() {
                        if change.config_changed() {
                            pending = Some(Arc::clone(&change.state.config));
                        }
                    }
                    if let Some(config) = pending.take() {
                        self.flush(&config).await;
                    }
                    break;
                }

                _ = tokio::time::sleep_until(sleep_until), if deadline.is_some() => {
                    if let Some(config) = pending.take() {
                        self.flush(&config).await;
                    }
                    deadline = None;
                    latest_allowed = None;
                }

                change = self.changes.recv() => {
                    let Some(change) = change else {
                        tracing::info!("Store change channel closed, PersistenceWorker stopping");
                        break;
                    };
                    if change.config_changed() {
                        pending = Some(Arc::clone(&change.state.config));
                        let now = Instant::now();
                        let cap = *latest_allowed.get_or_insert(now + max_wait);
                        deadline = Some((now + self.debounce).min(cap));
                    }
                }
            }
        }

        tracing::info!("PersistenceWorker stopped");
    }

    async fn flush(&self, config: &ConfigSnapshot) {
        match self.bridge.save(config).await {
            Ok(()) => tracing::debug!(
                zones = config.delivery_zones.len(),
                novels = config.novelas.len(),
                "Configuration persisted"
            ),
            Err(e) => {
                tracing::error!(error = %e, "Failed to persist configuration");
                self.store.notify_error(
                    Section::System,
                    "persist",
                    "Error al guardar",
                    format!("No se pudo guardar la configuración: {e}"),
                );
            }
        }
    }
}
