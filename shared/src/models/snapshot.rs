//! Configuration Snapshot
//!
//! 配置存储在某一时刻的完整可序列化内容 (价格 + 小说目录 + 配送区域)。

use serde::{Deserialize, Serialize};

use super::novel::Novel;
use super::pricing::PriceConfig;
use super::zone::DeliveryZone;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub pricing: PriceConfig,
    pub novelas: Vec<Novel>,
    #[serde(rename = "deliveryZones")]
    pub delivery_zones: Vec<DeliveryZone>,
}

impl ConfigSnapshot {
    pub fn zone(&self, id: i64) -> Option<&DeliveryZone> {
        self.delivery_zones.iter().find(|z| z.id == id)
    }

    pub fn novel(&self, id: i64) -> Option<&Novel> {
        self.novelas.iter().find(|n| n.id == id)
    }
}
