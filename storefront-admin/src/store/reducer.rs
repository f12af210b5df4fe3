//! Admin reducer
//!
//! `reduce(previous, action, now) -> next` is a pure function:
//! - never mutates `previous`
//! - returns the same `Arc` (pointer-equal) when the action is a no-op
//!   (guarded delete, unknown id, clearing an empty log)
//! - every effective mutation appends a notification describing it
//!
//! Ids come from the counters carried in the state, timestamps from `now`,
//! so identical `(previous, action, now)` always yield identical output.

use std::sync::Arc;

use shared::models::zone::default_full_path;
use shared::models::{
    ConfigSnapshot, DeliveryZone, Notification, NotificationDraft, Novel, PLACEHOLDER_ZONE_ID,
    Section,
};
use tracing::debug;

use super::action::{AdminAction, LoadSource};
use super::state::{AdminState, max_novel_id, max_zone_id};
use crate::pricing::{apply_transfer_fee, computed_novel_price};

pub fn reduce(previous: &Arc<AdminState>, action: &AdminAction, now: i64) -> Arc<AdminState> {
    let next = match action {
        AdminAction::UpdatePrices(pricing) => {
            if pricing.validate().is_err() {
                return Arc::clone(previous);
            }
            let mut config = (*previous.config).clone();
            config.pricing = *pricing;
            let mut state = with_config(previous, config);
            push_notification(
                &mut state,
                NotificationDraft::success(
                    Section::Prices,
                    "update",
                    "Precios actualizados",
                    format!(
                        "Película: ${} CUP, Serie: ${} CUP/temporada, Transferencia: {}%, Novela: ${} CUP/capítulo",
                        pricing.movie_price,
                        pricing.series_price_per_season,
                        pricing.transfer_fee_percentage,
                        pricing.novel_price_per_chapter
                    ),
                ),
                now,
            );
            state
        }

        AdminAction::AddZone(create) => {
            let mut config = (*previous.config).clone();
            let id = previous.next_zone_id;
            let name = create.name.trim().to_string();
            let full_path = create
                .full_path
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| default_full_path(&name));
            config.delivery_zones.push(DeliveryZone {
                id,
                name: name.clone(),
                full_path,
                cost: create.cost,
                active: create.active,
                created_at: now,
                updated_at: now,
            });
            let mut state = with_config(previous, config);
            state.next_zone_id = id + 1;
            push_notification(
                &mut state,
                NotificationDraft::success(
                    Section::Zones,
                    "create",
                    "Zona de entrega agregada",
                    format!("Se agregó la zona \"{}\" con costo de ${} CUP", name, create.cost),
                ),
                now,
            );
            state
        }

        AdminAction::UpdateZone { id, update } => {
            let Some(index) = previous.zones().iter().position(|z| z.id == *id) else {
                return Arc::clone(previous);
            };
            let mut config = (*previous.config).clone();
            let zone = &mut config.delivery_zones[index];
            if let Some(name) = &update.name {
                zone.name = name.trim().to_string();
            }
            if let Some(full_path) = &update.full_path {
                zone.full_path = full_path.clone();
            }
            if let Some(cost) = update.cost {
                zone.cost = cost;
            }
            if let Some(active) = update.active {
                zone.active = active;
            }
            zone.updated_at = now;
            let message = format!("Se actualizó la zona \"{}\" (${} CUP)", zone.name, zone.cost);
            let mut state = with_config(previous, config);
            push_notification(
                &mut state,
                NotificationDraft::success(Section::Zones, "update", "Zona de entrega actualizada", message),
                now,
            );
            state
        }

        AdminAction::DeleteZone(id) => {
            if *id == PLACEHOLDER_ZONE_ID {
                return Arc::clone(previous);
            }
            let Some(removed) = previous.zone(*id).cloned() else {
                return Arc::clone(previous);
            };
            let mut config = (*previous.config).clone();
            config.delivery_zones.retain(|z| z.id != *id);
            let mut state = with_config(previous, config);
            push_notification(
                &mut state,
                NotificationDraft::warning(
                    Section::Zones,
                    "delete",
                    "Zona de entrega eliminada",
                    format!("Se eliminó la zona \"{}\"", removed.name),
                ),
                now,
            );
            state
        }

        AdminAction::ToggleZone(id) => {
            let Some(index) = previous.zones().iter().position(|z| z.id == *id) else {
                return Arc::clone(previous);
            };
            let mut config = (*previous.config).clone();
            let zone = &mut config.delivery_zones[index];
            zone.active = !zone.active;
            zone.updated_at = now;
            let message = format!(
                "La zona \"{}\" ahora está {}",
                zone.name,
                if zone.active { "activa" } else { "inactiva" }
            );
            let mut state = with_config(previous, config);
            push_notification(
                &mut state,
                NotificationDraft::info(Section::Zones, "toggle", "Estado de zona cambiado", message),
                now,
            );
            state
        }

        AdminAction::AddNovel(create) => {
            let mut config = (*previous.config).clone();
            let id = previous.next_novel_id;
            let (cash, transfer) = novel_costs(create.chapters, create.cash_cost, &config);
            config.novelas.push(Novel {
                id,
                title: create.title.trim().to_string(),
                genre: create.genre.trim().to_string(),
                chapters: create.chapters,
                year: create.year,
                description: create.description.clone(),
                country: create.country.clone(),
                status: create.status,
                active: create.active,
                cash_cost: Some(cash),
                transfer_cost: Some(transfer),
                created_at: now,
                updated_at: now,
            });
            let mut state = with_config(previous, config);
            state.next_novel_id = id + 1;
            push_notification(
                &mut state,
                NotificationDraft::success(
                    Section::Novels,
                    "create",
                    "Novela agregada",
                    format!(
                        "Se agregó \"{}\" ({} capítulos, ${} CUP)",
                        create.title.trim(),
                        create.chapters,
                        cash
                    ),
                ),
                now,
            );
            state
        }

        AdminAction::UpdateNovel { id, update } => {
            let Some(index) = previous.novels().iter().position(|n| n.id == *id) else {
                return Arc::clone(previous);
            };
            let mut config = (*previous.config).clone();
            let pricing = config.pricing;
            let novel = &mut config.novelas[index];
            let chapters_changed = update.chapters.is_some_and(|c| c != novel.chapters);
            if let Some(title) = &update.title {
                novel.title = title.trim().to_string();
            }
            if let Some(genre) = &update.genre {
                novel.genre = genre.trim().to_string();
            }
            if let Some(chapters) = update.chapters {
                novel.chapters = chapters;
            }
            if let Some(year) = update.year {
                novel.year = year;
            }
            if let Some(description) = &update.description {
                novel.description = Some(description.clone());
            }
            if let Some(country) = &update.country {
                novel.country = Some(country.clone());
            }
            if let Some(status) = update.status {
                novel.status = status;
            }
            if let Some(active) = update.active {
                novel.active = active;
            }
            // 只有改了章节数或手动给价时才重算, 否则保留已存的价格快照
            if update.cash_cost.is_some() || chapters_changed {
                let cash = update
                    .cash_cost
                    .unwrap_or_else(|| computed_novel_price(novel.chapters, &pricing).cash);
                novel.cash_cost = Some(cash);
                novel.transfer_cost = Some(apply_transfer_fee(cash, pricing.transfer_fee_percentage));
            }
            novel.updated_at = now;
            let message = format!("Se actualizó \"{}\" ({} capítulos)", novel.title, novel.chapters);
            let mut state = with_config(previous, config);
            push_notification(
                &mut state,
                NotificationDraft::success(Section::Novels, "update", "Novela actualizada", message),
                now,
            );
            state
        }

        AdminAction::DeleteNovel(id) => {
            let Some(removed) = previous.novel(*id).cloned() else {
                return Arc::clone(previous);
            };
            let mut config = (*previous.config).clone();
            config.novelas.retain(|n| n.id != *id);
            let mut state = with_config(previous, config);
            push_notification(
                &mut state,
                NotificationDraft::warning(
                    Section::Novels,
                    "delete",
                    "Novela eliminada",
                    format!("Se eliminó \"{}\" del catálogo", removed.title),
                ),
                now,
            );
            state
        }

        AdminAction::Login { accepted } => {
            let mut state = (**previous).clone();
            if *accepted {
                state.is_authenticated = true;
                push_notification(
                    &mut state,
                    NotificationDraft::success(
                        Section::Auth,
                        "login",
                        "Sesión iniciada",
                        "Acceso al panel de control concedido",
                    ),
                    now,
                );
            } else {
                // Same text whichever field was wrong
                push_notification(
                    &mut state,
                    NotificationDraft::warning(
                        Section::Auth,
                        "login_failed",
                        "Acceso denegado",
                        "Credenciales incorrectas",
                    ),
                    now,
                );
            }
            state
        }

        AdminAction::Logout => {
            let mut state = (**previous).clone();
            state.is_authenticated = false;
            push_notification(
                &mut state,
                NotificationDraft::info(Section::Auth, "logout", "Sesión cerrada", "Se cerró la sesión del panel"),
                now,
            );
            state
        }

        AdminAction::LoadState { snapshot, source } => {
            let config = with_placeholder(snapshot.clone(), now);
            let mut state = (**previous).clone();
            state.next_zone_id = state.next_zone_id.max(max_zone_id(&config.delivery_zones) + 1);
            state.next_novel_id = state.next_novel_id.max(max_novel_id(&config.novelas) + 1);
            state.config = Arc::new(config);
            let draft = load_notification(*source, &state);
            push_notification(&mut state, draft, now);
            state
        }

        AdminAction::AddNotification(draft) => {
            let mut state = (**previous).clone();
            push_notification(&mut state, draft.clone(), now);
            state
        }

        AdminAction::ClearNotifications => {
            if previous.notifications.is_empty() {
                return Arc::clone(previous);
            }
            let mut state = (**previous).clone();
            state.notifications.clear();
            state
        }
    };

    debug!(
        action = action.name(),
        zones = next.zones().len(),
        novels = next.novels().len(),
        notifications = next.notifications.len(),
        "[Reducer] action applied"
    );

    Arc::new(next)
}

/// 用新配置克隆状态
fn with_config(previous: &AdminState, config: ConfigSnapshot) -> AdminState {
    AdminState {
        config: Arc::new(config),
        ..previous.clone()
    }
}

/// 追加通知，超出上限时淘汰最旧的条目
fn push_notification(state: &mut AdminState, draft: NotificationDraft, now: i64) {
    let id = state.next_notification_id;
    state.next_notification_id += 1;
    let notification: Notification = draft.into_notification(id, now);
    state.notifications.push_back(notification);
    while state.notifications.len() > state.notification_limit {
        state.notifications.pop_front();
    }
}

/// 保存时刻的价格快照 (显式现金价优先)
fn novel_costs(chapters: u32, cash_override: Option<u64>, config: &ConfigSnapshot) -> (u64, u64) {
    let cash = cash_override.unwrap_or_else(|| computed_novel_price(chapters, &config.pricing).cash);
    let transfer = apply_transfer_fee(cash, config.pricing.transfer_fee_percentage);
    (cash, transfer)
}

/// 确保占位区域存在
fn with_placeholder(mut config: ConfigSnapshot, now: i64) -> ConfigSnapshot {
    if !config.delivery_zones.iter().any(|z| z.is_placeholder()) {
        config.delivery_zones.insert(0, DeliveryZone::placeholder(now));
    }
    config
}

fn load_notification(source: LoadSource, state: &AdminState) -> NotificationDraft {
    let summary = format!(
        "{} zonas de entrega, {} novelas",
        state.zones().len(),
        state.novels().len()
    );
    match source {
        LoadSource::Startup => {
            NotificationDraft::info(Section::System, "load", "Configuración cargada", summary)
        }
        LoadSource::Import => {
            NotificationDraft::success(Section::Backup, "import", "Configuración importada", summary)
        }
        LoadSource::Remote => NotificationDraft::info(
            Section::Sync,
            "sync",
            "Configuración sincronizada",
            format!("Cambios recibidos de otra pestaña: {}", summary),
        ),
        LoadSource::Reset => NotificationDraft::warning(
            Section::System,
            "reset",
            "Configuración restablecida",
            format!("Se restauraron los valores por defecto: {}", summary),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::defaults::default_config;
    use shared::models::{
        DeliveryZoneCreate, DeliveryZoneUpdate, NotificationLevel, NovelCreate, NovelStatus,
        NovelUpdate, PriceConfig,
    };

    fn initial() -> Arc<AdminState> {
        Arc::new(AdminState::new(default_config(0), 50))
    }

    fn zone_create(name: &str, cost: u64) -> AdminAction {
        AdminAction::AddZone(DeliveryZoneCreate {
            name: name.to_string(),
            full_path: None,
            cost,
            active: true,
        })
    }

    fn novel_create(title: &str, chapters: u32, cash: Option<u64>) -> AdminAction {
        AdminAction::AddNovel(NovelCreate {
            title: title.to_string(),
            genre: "Drama".to_string(),
            chapters,
            year: 2001,
            description: None,
            country: Some("México".to_string()),
            status: NovelStatus::Transmision,
            active: true,
            cash_cost: cash,
        })
    }

    #[test]
    fn test_reduce_does_not_mutate_previous() {
        let before = initial();
        let zones_before = before.zones().len();
        let after = reduce(&before, &zone_create("Trocha", 200), 10);
        assert_eq!(before.zones().len(), zones_before);
        assert_eq!(after.zones().len(), zones_before + 1);
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn test_add_zone_assigns_monotonic_ids_and_timestamps() {
        let s0 = initial();
        let first_id = s0.next_zone_id;
        let s1 = reduce(&s0, &zone_create("Trocha", 200), 10);
        let s2 = reduce(&s1, &AdminAction::DeleteZone(first_id), 11);
        let s3 = reduce(&s2, &zone_create("Versalles", 800), 12);

        let versalles = s3.zones().iter().find(|z| z.name == "Versalles").unwrap();
        // Deleted ids are never reused
        assert_eq!(versalles.id, first_id + 1);
        assert_eq!(versalles.created_at, 12);
        assert_eq!(versalles.full_path, "Santiago de Cuba > Santiago de Cuba > Versalles");
    }

    #[test]
    fn test_delete_placeholder_is_noop() {
        let s0 = initial();
        let s1 = reduce(&s0, &AdminAction::DeleteZone(PLACEHOLDER_ZONE_ID), 10);
        assert!(Arc::ptr_eq(&s0, &s1));

        let s2 = reduce(&s0, &zone_create("Trocha", 200), 10);
        let s3 = reduce(&s2, &AdminAction::DeleteZone(PLACEHOLDER_ZONE_ID), 11);
        assert!(Arc::ptr_eq(&s2, &s3));
        assert_eq!(s3.zones(), s2.zones());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let s0 = initial();
        for action in [
            AdminAction::DeleteZone(999),
            AdminAction::ToggleZone(999),
            AdminAction::DeleteNovel(999),
            AdminAction::UpdateZone { id: 999, update: DeliveryZoneUpdate::default() },
            AdminAction::UpdateNovel { id: 999, update: NovelUpdate::default() },
        ] {
            let s1 = reduce(&s0, &action, 5);
            assert!(Arc::ptr_eq(&s0, &s1), "{action} should be a no-op");
        }
    }

    #[test]
    fn test_update_prices_records_notification() {
        let s0 = initial();
        let pricing = PriceConfig {
            movie_price: 100,
            ..Default::default()
        };
        let s1 = reduce(&s0, &AdminAction::UpdatePrices(pricing), 7);
        assert_eq!(s1.pricing().movie_price, 100);
        let last = s1.notifications.back().unwrap();
        assert_eq!(last.section, Section::Prices);
        assert_eq!(last.level, NotificationLevel::Success);
        assert_eq!(last.timestamp, 7);
    }

    #[test]
    fn test_invalid_prices_are_ignored() {
        let s0 = initial();
        let pricing = PriceConfig {
            transfer_fee_percentage: 150,
            ..Default::default()
        };
        let s1 = reduce(&s0, &AdminAction::UpdatePrices(pricing), 7);
        assert!(Arc::ptr_eq(&s0, &s1));
    }

    #[test]
    fn test_novel_costs_are_frozen_snapshots() {
        let s0 = initial();
        let s1 = reduce(&s0, &novel_create("Café con aroma de mujer", 100, None), 1);
        let id = s1.next_novel_id - 1;
        let novel = s1.novel(id).unwrap();
        assert_eq!(novel.cash_cost, Some(500));
        assert_eq!(novel.transfer_cost, Some(550));

        // A later fee change leaves the stored snapshot alone
        let pricing = PriceConfig {
            transfer_fee_percentage: 20,
            novel_price_per_chapter: 6,
            ..*s1.pricing()
        };
        let s2 = reduce(&s1, &AdminAction::UpdatePrices(pricing), 2);
        assert_eq!(s2.novel(id).unwrap().cash_cost, Some(500));
        assert_eq!(s2.novel(id).unwrap().transfer_cost, Some(550));

        // Changing the chapter count recomputes from the current configuration
        let update = NovelUpdate {
            chapters: Some(120),
            ..Default::default()
        };
        let s3 = reduce(&s2, &AdminAction::UpdateNovel { id, update }, 3);
        let novel = s3.novel(id).unwrap();
        assert_eq!(novel.cash_cost, Some(720));
        assert_eq!(novel.transfer_cost, Some(864));
        assert_eq!(novel.updated_at, 3);
    }

    #[test]
    fn test_unrelated_novel_edit_keeps_manual_price() {
        let s1 = reduce(&initial(), &novel_create("Pasión de Gavilanes", 188, Some(700)), 1);
        let id = s1.next_novel_id - 1;

        let year_only = NovelUpdate {
            year: Some(2004),
            ..Default::default()
        };
        let s2 = reduce(&s1, &AdminAction::UpdateNovel { id, update: year_only }, 2);
        let novel = s2.novel(id).unwrap();
        assert_eq!(novel.year, 2004);
        assert_eq!(novel.cash_cost, Some(700));
        assert_eq!(novel.transfer_cost, Some(770));

        // Same chapter count resubmitted by the form is not a change either
        let same_chapters = NovelUpdate {
            chapters: Some(188),
            ..Default::default()
        };
        let s3 = reduce(&s2, &AdminAction::UpdateNovel { id, update: same_chapters }, 3);
        assert_eq!(s3.novel(id).unwrap().cash_cost, Some(700));

        let more_chapters = NovelUpdate {
            chapters: Some(190),
            ..Default::default()
        };
        let s4 = reduce(&s3, &AdminAction::UpdateNovel { id, update: more_chapters }, 4);
        assert_eq!(s4.novel(id).unwrap().cash_cost, Some(950));
        assert_eq!(s4.novel(id).unwrap().transfer_cost, Some(1045));
    }

    #[test]
    fn test_manual_novel_price_wins() {
        let s1 = reduce(&initial(), &novel_create("Pasión de Gavilanes", 188, Some(700)), 1);
        let novel = s1.novels().last().unwrap();
        assert_eq!(novel.cash_cost, Some(700));
        assert_eq!(novel.transfer_cost, Some(770));
    }

    #[test]
    fn test_toggle_zone_flips_active() {
        let s0 = initial();
        let s1 = reduce(&s0, &AdminAction::ToggleZone(2), 1);
        assert!(!s1.zone(2).unwrap().active);
        let s2 = reduce(&s1, &AdminAction::ToggleZone(2), 2);
        assert!(s2.zone(2).unwrap().active);
    }

    #[test]
    fn test_failed_login_keeps_auth_and_logs_warning() {
        let s0 = initial();
        let s1 = reduce(&s0, &AdminAction::Login { accepted: false }, 1);
        assert!(!s1.is_authenticated);
        let last = s1.notifications.back().unwrap();
        assert_eq!(last.level, NotificationLevel::Warning);
        assert_eq!(last.message, "Credenciales incorrectas");
        // Auth-only changes keep the configuration pointer
        assert!(Arc::ptr_eq(&s0.config, &s1.config));

        let s2 = reduce(&s1, &AdminAction::Login { accepted: true }, 2);
        assert!(s2.is_authenticated);
        let s3 = reduce(&s2, &AdminAction::Logout, 3);
        assert!(!s3.is_authenticated);
    }

    #[test]
    fn test_notification_log_is_bounded() {
        let mut state = Arc::new(AdminState::new(default_config(0), 5));
        for i in 0..8 {
            let draft = NotificationDraft::info(Section::System, "test", format!("n{i}"), "");
            state = reduce(&state, &AdminAction::AddNotification(draft), i);
        }
        assert_eq!(state.notifications.len(), 5);
        let titles: Vec<&str> = state.notifications.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["n3", "n4", "n5", "n6", "n7"]);
        assert_eq!(state.recent_notifications(1)[0].title, "n7");
    }

    #[test]
    fn test_clear_notifications() {
        let s0 = initial();
        assert!(Arc::ptr_eq(&s0, &reduce(&s0, &AdminAction::ClearNotifications, 1)));
        let s1 = reduce(&s0, &AdminAction::Logout, 1);
        let s2 = reduce(&s1, &AdminAction::ClearNotifications, 2);
        assert!(s2.notifications.is_empty());
    }

    #[test]
    fn test_load_state_keeps_counters_monotonic_and_placeholder() {
        let s0 = initial();
        let s1 = reduce(&s0, &zone_create("Trocha", 200), 1);
        let high_water = s1.next_zone_id;

        let mut snapshot = default_config(0);
        snapshot.delivery_zones.retain(|z| !z.is_placeholder());
        snapshot.delivery_zones.truncate(2);
        let s2 = reduce(
            &s1,
            &AdminAction::LoadState { snapshot, source: LoadSource::Import },
            2,
        );
        assert!(s2.zone(PLACEHOLDER_ZONE_ID).is_some());
        assert_eq!(s2.next_zone_id, high_water);
        assert_eq!(s2.notifications.back().unwrap().section, Section::Backup);
    }
}
