//! Admin actions
//!
//! The only legal way to change the configuration store. Each variant carries
//! exactly what its reduction needs; ids and timestamps are synthesized by the
//! reducer from the state counters and the dispatch time.

use serde::Serialize;
use shared::models::{
    ConfigSnapshot, DeliveryZoneCreate, DeliveryZoneUpdate, NotificationDraft, NovelCreate,
    NovelUpdate, PriceConfig,
};
use std::fmt;

/// `LoadState` 的来源，决定记录哪条通知
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadSource {
    /// 启动时从持久化协作者加载
    Startup,
    /// 导入配置文件
    Import,
    /// 其他浏览上下文广播的变更
    Remote,
    /// 恢复默认配置
    Reset,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdminAction {
    UpdatePrices(PriceConfig),
    AddZone(DeliveryZoneCreate),
    UpdateZone { id: i64, update: DeliveryZoneUpdate },
    DeleteZone(i64),
    ToggleZone(i64),
    AddNovel(NovelCreate),
    UpdateNovel { id: i64, update: NovelUpdate },
    DeleteNovel(i64),
    /// 凭据已由 store 校验，这里只记录结果
    Login { accepted: bool },
    Logout,
    LoadState { snapshot: ConfigSnapshot, source: LoadSource },
    AddNotification(NotificationDraft),
    ClearNotifications,
}

impl AdminAction {
    /// 动作名 (日志用)
    pub fn name(&self) -> &'static str {
        match self {
            AdminAction::UpdatePrices(_) => "UPDATE_PRICES",
            AdminAction::AddZone(_) => "ADD_ZONE",
            AdminAction::UpdateZone { .. } => "UPDATE_ZONE",
            AdminAction::DeleteZone(_) => "DELETE_ZONE",
            AdminAction::ToggleZone(_) => "TOGGLE_ZONE",
            AdminAction::AddNovel(_) => "ADD_NOVEL",
            AdminAction::UpdateNovel { .. } => "UPDATE_NOVEL",
            AdminAction::DeleteNovel(_) => "DELETE_NOVEL",
            AdminAction::Login { .. } => "LOGIN",
            AdminAction::Logout => "LOGOUT",
            AdminAction::LoadState { .. } => "LOAD_STATE",
            AdminAction::AddNotification(_) => "ADD_NOTIFICATION",
            AdminAction::ClearNotifications => "CLEAR_NOTIFICATIONS",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
