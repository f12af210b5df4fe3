//! Admin state projection

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use shared::models::{ConfigSnapshot, DeliveryZone, Notification, Novel, PriceConfig};

/// 通知日志默认上限
pub const DEFAULT_NOTIFICATION_LIMIT: usize = 50;

/// 管理状态 - 配置存储的完整内存投影
///
/// 从不原地修改：每次变更由 reducer 生成新的 `Arc<AdminState>`，
/// 观察者通过指针比较即可判断是否发生变化。`config` 单独包在 `Arc` 中，
/// 仅通知/登录类变更会复用同一个配置指针。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminState {
    pub config: Arc<ConfigSnapshot>,
    pub is_authenticated: bool,
    /// 最旧在前，超出上限时从队首淘汰
    pub notifications: VecDeque<Notification>,
    pub notification_limit: usize,
    /// 下一个区域 ID (进程内单调)
    pub next_zone_id: i64,
    /// 下一个小说 ID (进程内单调)
    pub next_novel_id: i64,
    pub next_notification_id: u64,
}

/// 仪表盘统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub zones: usize,
    pub active_zones: usize,
    pub novels: usize,
    pub active_novels: usize,
    pub total_chapters: u64,
    pub notifications: usize,
}

impl AdminState {
    /// 从配置快照构建初始状态
    pub fn new(config: ConfigSnapshot, notification_limit: usize) -> Self {
        let next_zone_id = max_zone_id(&config.delivery_zones) + 1;
        let next_novel_id = max_novel_id(&config.novelas) + 1;
        Self {
            config: Arc::new(config),
            is_authenticated: false,
            notifications: VecDeque::new(),
            notification_limit: notification_limit.max(1),
            next_zone_id,
            next_novel_id,
            next_notification_id: 1,
        }
    }

    pub fn pricing(&self) -> &PriceConfig {
        &self.config.pricing
    }

    pub fn zones(&self) -> &[DeliveryZone] {
        &self.config.delivery_zones
    }

    pub fn novels(&self) -> &[Novel] {
        &self.config.novelas
    }

    pub fn zone(&self, id: i64) -> Option<&DeliveryZone> {
        self.config.zone(id)
    }

    pub fn novel(&self, id: i64) -> Option<&Novel> {
        self.config.novel(id)
    }

    /// 可供结账选择的区域 (启用且非占位)
    pub fn selectable_zones(&self) -> impl Iterator<Item = &DeliveryZone> {
        self.zones().iter().filter(|z| z.active && !z.is_placeholder())
    }

    /// 最新的通知在前
    pub fn recent_notifications(&self, limit: usize) -> Vec<&Notification> {
        self.notifications.iter().rev().take(limit).collect()
    }

    pub fn stats(&self) -> AdminStats {
        AdminStats {
            zones: self.zones().len(),
            active_zones: self.zones().iter().filter(|z| z.active).count(),
            novels: self.novels().len(),
            active_novels: self.novels().iter().filter(|n| n.active).count(),
            total_chapters: self.novels().iter().map(|n| u64::from(n.chapters)).sum(),
            notifications: self.notifications.len(),
        }
    }
}

pub(crate) fn max_zone_id(zones: &[DeliveryZone]) -> i64 {
    zones.iter().map(|z| z.id).max().unwrap_or(0)
}

pub(crate) fn max_novel_id(novels: &[Novel]) -> i64 {
    novels.iter().map(|n| n.id).max().unwrap_or(0)
}
