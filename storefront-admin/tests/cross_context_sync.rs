//! Two or three browsing contexts sharing one in-process key-value store.

use std::sync::Arc;
use std::time::Duration;

use shared::models::{ConfigSnapshot, PriceConfig, SyncBody, SyncEnvelope};
use shared::util::now_millis;
use storefront_admin::persistence::ImportError;
use storefront_admin::sync::{STATE_TOPIC, SyncChannel};
use storefront_admin::{AppContext, Config, KvSyncChannel, MemoryKv};
use tokio::time::{sleep, timeout};

fn test_config(context_id: &str) -> Config {
    let mut config = Config::with_overrides("./target/test-data", context_id);
    config.sync_poll_interval_ms = 40;
    config.heartbeat_interval_ms = 60;
    config.persist_debounce_ms = 10;
    config.max_notifications = 50;
    config.admin_username = "admin".into();
    config.admin_password = "admin".into();
    config
}

async fn context(kv: &MemoryKv, id: &str) -> AppContext {
    AppContext::initialize(test_config(id), Arc::new(kv.clone())).await
}

/// Poll `check` until it holds or two seconds pass
async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    timeout(Duration::from_secs(2), async {
        while !check() {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .is_ok()
}

fn priced(movie_price: u64) -> PriceConfig {
    PriceConfig {
        movie_price,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_change_propagates_to_other_context() {
    let kv = MemoryKv::new();
    let a = context(&kv, "tab-a").await;
    let b = context(&kv, "tab-b").await;

    a.store.update_prices(priced(100)).unwrap();
    assert!(eventually(|| b.store.state().pricing().movie_price == 100).await);

    a.store.delete_zone(3);
    assert!(eventually(|| b.store.state().zone(3).is_none()).await);

    // Notifications and auth stay local
    a.store.login("admin", "admin");
    sleep(Duration::from_millis(100)).await;
    assert!(!b.store.is_authenticated());

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn test_later_envelope_wins_for_observer() {
    let kv = MemoryKv::new();
    let c = context(&kv, "tab-c").await;
    let channel = KvSyncChannel::new(Arc::new(kv.clone()));

    let base = now_millis() + 60_000;
    let mut snapshot: ConfigSnapshot = c.store.snapshot();

    snapshot.pricing.movie_price = 100;
    let from_a = SyncEnvelope::new("tab-a", base + 10, SyncBody::StateUpdate(snapshot.clone()));
    snapshot.pricing.movie_price = 120;
    let from_b = SyncEnvelope::new("tab-b", base + 12, SyncBody::StateUpdate(snapshot.clone()));

    channel.publish(STATE_TOPIC, &from_a).await.unwrap();
    assert!(eventually(|| c.store.state().pricing().movie_price == 100).await);
    channel.publish(STATE_TOPIC, &from_b).await.unwrap();
    assert!(eventually(|| c.store.state().pricing().movie_price == 120).await);

    // A late delivery of the older envelope changes nothing
    assert!(!c.sync.handle_envelope(from_a));
    assert_eq!(c.store.state().pricing().movie_price, 120);

    c.shutdown().await;
}

#[tokio::test]
async fn test_replayed_envelope_is_idempotent() {
    let kv = MemoryKv::new();
    let c = context(&kv, "tab-c").await;
    let channel = KvSyncChannel::new(Arc::new(kv.clone()));

    let mut snapshot = c.store.snapshot();
    snapshot.pricing.transfer_fee_percentage = 20;
    let envelope = SyncEnvelope::new("tab-a", now_millis() + 60_000, SyncBody::StateUpdate(snapshot));

    channel.publish(STATE_TOPIC, &envelope).await.unwrap();
    assert!(eventually(|| c.store.state().pricing().transfer_fee_percentage == 20).await);
    let once = c.store.state();

    // Same envelope through the push path and the poll path again
    channel.publish(STATE_TOPIC, &envelope).await.unwrap();
    sleep(Duration::from_millis(120)).await;
    assert!(Arc::ptr_eq(&once, &c.store.state()));

    c.shutdown().await;
}

#[tokio::test]
async fn test_offline_changes_are_retried() {
    let kv = MemoryKv::new();
    let a = context(&kv, "tab-a").await;
    let b = context(&kv, "tab-b").await;

    kv.set_offline(true);
    a.store.update_prices(priced(95)).unwrap();
    assert!(eventually(|| !a.sync.status().is_online).await);
    assert_eq!(b.store.state().pricing().movie_price, 80);

    kv.set_offline(false);
    assert!(eventually(|| b.store.state().pricing().movie_price == 95).await);
    assert!(eventually(|| a.sync.status().is_online && a.sync.status().pending_changes == 0).await);

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn test_export_import_roundtrip_between_contexts() {
    let a = context(&MemoryKv::new(), "tab-a").await;
    let b = context(&MemoryKv::new(), "tab-b").await;

    a.store.update_prices(priced(110)).unwrap();
    a.store.toggle_zone(4).unwrap();
    a.store.delete_novel(5);

    let exported = a.export_config().unwrap();
    b.import_config(&exported).unwrap();
    assert_eq!(b.store.snapshot(), a.store.snapshot());

    a.shutdown().await;
    b.shutdown().await;
}

#[tokio::test]
async fn test_import_without_zones_leaves_store_unchanged() {
    let a = context(&MemoryKv::new(), "tab-a").await;
    let before = a.store.state();

    let payload = serde_json::json!({
        "pricing": { "moviePrice": 1, "seriesPrice": 1, "transferFeePercentage": 1 },
        "novelas": []
    });
    let err = a.import_config(&payload.to_string()).unwrap_err();
    assert!(matches!(err, ImportError::MissingField("deliveryZones")));
    assert!(Arc::ptr_eq(&before, &a.store.state()));

    a.shutdown().await;
}

#[tokio::test]
async fn test_restart_loads_persisted_configuration() {
    let kv = MemoryKv::new();
    let a = context(&kv, "tab-a").await;
    a.store.update_prices(priced(130)).unwrap();
    a.store.delete_zone(2);
    a.shutdown().await;

    let reopened = context(&kv, "tab-a2").await;
    let state = reopened.store.state();
    assert_eq!(state.pricing().movie_price, 130);
    assert!(state.zone(2).is_none());
    assert!(state.zone(1).is_some());
    reopened.shutdown().await;
}

#[tokio::test]
async fn test_last_edit_before_shutdown_survives_restart() {
    let kv = MemoryKv::new();
    for round in 0..10u64 {
        let ctx = context(&kv, &format!("tab-{round}")).await;
        assert_eq!(ctx.store.state().pricing().movie_price, 80 + round);

        // Shut down right away, inside the debounce window
        ctx.store.update_prices(priced(81 + round)).unwrap();
        ctx.shutdown().await;
    }

    let last = context(&kv, "tab-last").await;
    assert_eq!(last.store.state().pricing().movie_price, 90);
    last.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_stops_listening() {
    let kv = MemoryKv::new();
    let a = context(&kv, "tab-a").await;
    let b = context(&kv, "tab-b").await;
    assert_eq!(b.check_health(), 0);

    let b_store = b.store.clone();
    b.shutdown().await;

    a.store.update_prices(priced(140)).unwrap();
    sleep(Duration::from_millis(150)).await;
    assert_eq!(b_store.state().pricing().movie_price, 80);

    a.shutdown().await;
}
