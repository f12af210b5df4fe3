//! AdminStore - the single authoritative configuration projection
//!
//! # Dispatch Flow
//!
//! ```text
//! dispatch(action)
//!     ├─ 1. Serialize with other dispatchers (dispatch order == apply order)
//!     ├─ 2. reduce(current, action, now)
//!     ├─ 3. Same Arc returned? -> no-op, stop
//!     ├─ 4. Swap the held reference
//!     └─ 5. Notify observers (local or remote origin)
//! ```
//!
//! Input validation for the command-style helpers happens before dispatch:
//! a rejected call records nothing.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use shared::models::{
    ConfigSnapshot, DeliveryZoneCreate, DeliveryZoneUpdate, NotificationDraft, NovelCreate,
    NovelUpdate, PriceConfig, Section, PLACEHOLDER_ZONE_ID,
};
use shared::util::now_millis;
use shared::{AppError, AppResult};
use tracing::{debug, info, warn};

use super::action::{AdminAction, LoadSource};
use super::defaults::default_config;
use super::observer::{ChangeOrigin, StateChange, StoreObserver};
use super::reducer::reduce;
use super::state::AdminState;

/// 固定的管理员凭据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Default for Credentials {
    fn default() -> Self {
        Self::new("admin", "admin")
    }
}

struct StoreInner {
    state: RwLock<Arc<AdminState>>,
    observers: RwLock<Vec<Arc<dyn StoreObserver>>>,
    /// Held across reduce + swap + notify
    dispatch_lock: Mutex<()>,
    credentials: Credentials,
}

/// Configuration store handle
///
/// Cheap to clone; every clone refers to the same state. Constructed once per
/// browsing context and handed to every consumer.
#[derive(Clone)]
pub struct AdminStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for AdminStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("AdminStore")
            .field("zones", &state.zones().len())
            .field("novels", &state.novels().len())
            .field("notifications", &state.notifications.len())
            .field("is_authenticated", &state.is_authenticated)
            .finish()
    }
}

impl AdminStore {
    pub fn new(config: ConfigSnapshot, notification_limit: usize, credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(Arc::new(AdminState::new(config, notification_limit))),
                observers: RwLock::new(Vec::new()),
                dispatch_lock: Mutex::new(()),
                credentials,
            }),
        }
    }

    /// Store seeded with the built-in defaults
    pub fn with_defaults(notification_limit: usize, credentials: Credentials) -> Self {
        Self::new(default_config(now_millis()), notification_limit, credentials)
    }

    /// Current state reference
    pub fn state(&self) -> Arc<AdminState> {
        self.inner.state.read().clone()
    }

    /// Current configuration snapshot (pricing + novelas + zones)
    pub fn snapshot(&self) -> ConfigSnapshot {
        (*self.state().config).clone()
    }

    pub fn add_observer(&self, observer: Arc<dyn StoreObserver>) {
        self.inner.observers.write().push(observer);
    }

    /// Apply a local action. Returns the resulting state.
    pub fn dispatch(&self, action: AdminAction) -> Arc<AdminState> {
        self.dispatch_with_origin(action, ChangeOrigin::Local)
    }

    /// Replace the configuration with a snapshot received from another context
    pub fn apply_remote(&self, snapshot: ConfigSnapshot) -> Arc<AdminState> {
        self.dispatch_with_origin(
            AdminAction::LoadState {
                snapshot,
                source: LoadSource::Remote,
            },
            ChangeOrigin::Remote,
        )
    }

    /// Like [`apply_remote`](Self::apply_remote), but `admit` is evaluated under the
    /// dispatch lock first. Returns None when it refuses the snapshot.
    ///
    /// Local changes ordered before or after the remote one can't slip in between
    /// the check and the apply.
    pub fn apply_remote_if(
        &self,
        snapshot: ConfigSnapshot,
        admit: impl FnOnce() -> bool,
    ) -> Option<Arc<AdminState>> {
        let _guard = self.inner.dispatch_lock.lock();
        if !admit() {
            return None;
        }
        Some(self.dispatch_locked(
            AdminAction::LoadState {
                snapshot,
                source: LoadSource::Remote,
            },
            ChangeOrigin::Remote,
        ))
    }

    fn dispatch_with_origin(&self, action: AdminAction, origin: ChangeOrigin) -> Arc<AdminState> {
        let _guard = self.inner.dispatch_lock.lock();
        self.dispatch_locked(action, origin)
    }

    /// Caller holds `dispatch_lock`
    fn dispatch_locked(&self, action: AdminAction, origin: ChangeOrigin) -> Arc<AdminState> {
        let previous = self.state();
        let next = reduce(&previous, &action, now_millis());
        if Arc::ptr_eq(&previous, &next) {
            debug!(action = action.name(), "[AdminStore] no-op action");
            return next;
        }

        *self.inner.state.write() = Arc::clone(&next);

        let change = StateChange {
            state: Arc::clone(&next),
            previous,
            origin,
            action: action.name(),
        };
        let observers = self.inner.observers.read().clone();
        for observer in &observers {
            observer.on_change(&change);
        }

        next
    }

    // ========== Pricing ==========

    pub fn update_prices(&self, pricing: PriceConfig) -> AppResult<()> {
        if let Err(e) = pricing.validate() {
            warn!(error = %e, "[AdminStore] rejected price update");
            return Err(AppError::validation(e));
        }
        self.dispatch(AdminAction::UpdatePrices(pricing));
        Ok(())
    }

    /// Price update from an untyped form payload
    ///
    /// Missing or non-numeric fields reject the whole update.
    /// `novelPricePerChapter` falls back to the current value.
    pub fn update_prices_from_form(&self, form: &serde_json::Value) -> AppResult<()> {
        let current = *self.state().pricing();
        let field = |name: &str| -> AppResult<u64> {
            form.get(name)
                .and_then(serde_json::Value::as_u64)
                .ok_or_else(|| AppError::validation(format!("{name} must be a non-negative integer")))
        };

        let pricing = PriceConfig {
            movie_price: field("moviePrice")?,
            series_price_per_season: field("seriesPrice").or_else(|_| field("seriesPricePerSeason"))?,
            transfer_fee_percentage: u32::try_from(field("transferFeePercentage")?)
                .map_err(|_| AppError::validation("transferFeePercentage out of range"))?,
            novel_price_per_chapter: match form.get("novelPricePerChapter") {
                None | Some(serde_json::Value::Null) => current.novel_price_per_chapter,
                Some(_) => field("novelPricePerChapter")?,
            },
        };
        self.update_prices(pricing)
    }

    // ========== Delivery zones ==========

    /// Returns the id assigned to the new zone
    pub fn add_zone(&self, create: DeliveryZoneCreate) -> AppResult<i64> {
        if create.name.trim().is_empty() {
            return Err(AppError::validation("zone name is required"));
        }
        let state = self.dispatch(AdminAction::AddZone(create));
        Ok(state.next_zone_id - 1)
    }

    pub fn update_zone(&self, id: i64, update: DeliveryZoneUpdate) -> AppResult<()> {
        if self.state().zone(id).is_none() {
            return Err(AppError::not_found(format!("delivery zone {id}")));
        }
        if matches!(&update.name, Some(name) if name.trim().is_empty()) {
            return Err(AppError::validation("zone name is required"));
        }
        self.dispatch(AdminAction::UpdateZone { id, update });
        Ok(())
    }

    /// Returns false when nothing was deleted (placeholder or unknown id)
    pub fn delete_zone(&self, id: i64) -> bool {
        if id == PLACEHOLDER_ZONE_ID {
            warn!(zone_id = id, "[AdminStore] placeholder zone cannot be deleted");
            return false;
        }
        let before = self.state();
        let after = self.dispatch(AdminAction::DeleteZone(id));
        !Arc::ptr_eq(&before.config, &after.config)
    }

    pub fn toggle_zone(&self, id: i64) -> AppResult<bool> {
        if self.state().zone(id).is_none() {
            return Err(AppError::not_found(format!("delivery zone {id}")));
        }
        let state = self.dispatch(AdminAction::ToggleZone(id));
        Ok(state.zone(id).is_some_and(|z| z.active))
    }

    // ========== Novels ==========

    pub fn add_novel(&self, create: NovelCreate) -> AppResult<i64> {
        if create.title.trim().is_empty() {
            return Err(AppError::validation("titulo is required"));
        }
        if create.chapters < 1 {
            return Err(AppError::validation("capitulos must be at least 1"));
        }
        let state = self.dispatch(AdminAction::AddNovel(create));
        Ok(state.next_novel_id - 1)
    }

    pub fn update_novel(&self, id: i64, update: NovelUpdate) -> AppResult<()> {
        if self.state().novel(id).is_none() {
            return Err(AppError::not_found(format!("novel {id}")));
        }
        if update.chapters == Some(0) {
            return Err(AppError::validation("capitulos must be at least 1"));
        }
        if matches!(&update.title, Some(title) if title.trim().is_empty()) {
            return Err(AppError::validation("titulo is required"));
        }
        self.dispatch(AdminAction::UpdateNovel { id, update });
        Ok(())
    }

    pub fn delete_novel(&self, id: i64) -> bool {
        let before = self.state();
        let after = self.dispatch(AdminAction::DeleteNovel(id));
        !Arc::ptr_eq(&before.config, &after.config)
    }

    // ========== Auth ==========

    /// Fixed credential check. Failures are logged without naming the field.
    pub fn login(&self, username: &str, password: &str) -> bool {
        let accepted = self.inner.credentials.matches(username, password);
        if accepted {
            info!("[AdminStore] admin login accepted");
        } else {
            warn!("[AdminStore] admin login rejected");
        }
        self.dispatch(AdminAction::Login { accepted });
        accepted
    }

    pub fn logout(&self) {
        self.dispatch(AdminAction::Logout);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated
    }

    // ========== Bulk / notifications ==========

    pub fn load_state(&self, snapshot: ConfigSnapshot, source: LoadSource) {
        self.dispatch(AdminAction::LoadState { snapshot, source });
    }

    pub fn reset_to_defaults(&self) {
        info!("[AdminStore] resetting configuration to defaults");
        self.load_state(default_config(now_millis()), LoadSource::Reset);
    }

    pub fn notify(&self, draft: NotificationDraft) {
        self.dispatch(AdminAction::AddNotification(draft));
    }

    /// Record an error-level notification
    pub fn notify_error(&self, section: Section, action: &str, title: &str, message: impl Into<String>) {
        self.notify(NotificationDraft::error(section, action, title, message));
    }

    pub fn clear_notifications(&self) {
        self.dispatch(AdminAction::ClearNotifications);
    }
}
