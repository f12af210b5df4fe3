//! Delivery Zone Model

use serde::{Deserialize, Serialize};

/// 占位区域 ID ("请选择区域")，结构性数据，不可删除
pub const PLACEHOLDER_ZONE_ID: i64 = 1;

/// 占位区域显示名
pub const PLACEHOLDER_ZONE_NAME: &str = "Por favor seleccionar su Barrio/Zona";

/// 未提供 fullPath 时使用的路径前缀
pub const DEFAULT_ZONE_PATH_PREFIX: &str = "Santiago de Cuba > Santiago de Cuba";

/// Delivery zone entity (配送区域)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZone {
    pub id: i64,
    pub name: String,
    /// 完整路径 (省 > 市 > 街区)
    #[serde(default)]
    pub full_path: String,
    /// 配送费
    pub cost: u64,
    #[serde(default = "default_true")]
    pub active: bool,
    /// Unix millis
    #[serde(default)]
    pub created_at: i64,
    /// Unix millis
    #[serde(default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

impl DeliveryZone {
    /// 是否为占位区域
    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ZONE_ID
    }

    /// The placeholder entry every zone table starts with.
    pub fn placeholder(now: i64) -> Self {
        Self {
            id: PLACEHOLDER_ZONE_ID,
            name: PLACEHOLDER_ZONE_NAME.to_string(),
            full_path: PLACEHOLDER_ZONE_NAME.to_string(),
            cost: 0,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// 由区域名推导默认完整路径
pub fn default_full_path(name: &str) -> String {
    format!("{} > {}", DEFAULT_ZONE_PATH_PREFIX, name)
}

/// Create delivery zone payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZoneCreate {
    pub name: String,
    pub full_path: Option<String>,
    pub cost: u64,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Update delivery zone payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryZoneUpdate {
    pub name: Option<String>,
    pub full_path: Option<String>,
    pub cost: Option<u64>,
    pub active: Option<bool>,
}

impl DeliveryZoneUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.full_path.is_none() && self.cost.is_none() && self.active.is_none()
    }
}
