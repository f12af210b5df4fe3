//! Pricing Model

use serde::{Deserialize, Serialize};

/// 转账附加费百分比上限
pub const MAX_TRANSFER_FEE_PERCENTAGE: u32 = 100;

/// 全局价格配置 (单实例，由管理员整体替换)
///
/// 货币单位为整数 CUP，不建模分位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceConfig {
    /// 单部电影价格
    pub movie_price: u64,
    /// 剧集每季价格
    #[serde(rename = "seriesPrice", alias = "seriesPricePerSeason")]
    pub series_price_per_season: u64,
    /// 转账附加费百分比 (0-100)
    pub transfer_fee_percentage: u32,
    /// 小说 (novela) 每集价格
    #[serde(default = "default_novel_price_per_chapter")]
    pub novel_price_per_chapter: u64,
}

fn default_novel_price_per_chapter() -> u64 {
    5
}

impl PriceConfig {
    /// Checks the value ranges that the type system cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.transfer_fee_percentage > MAX_TRANSFER_FEE_PERCENTAGE {
            return Err(format!(
                "transferFeePercentage must be between 0 and {}, got {}",
                MAX_TRANSFER_FEE_PERCENTAGE, self.transfer_fee_percentage
            ));
        }
        Ok(())
    }
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            movie_price: 80,
            series_price_per_season: 300,
            transfer_fee_percentage: 10,
            novel_price_per_chapter: default_novel_price_per_chapter(),
        }
    }
}

/// 单个商品的两种支付价格
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemPrice {
    /// 现金价
    pub cash: u64,
    /// 转账价 (含附加费)
    pub transfer: u64,
}

impl ItemPrice {
    /// 附加费部分
    pub fn surcharge(&self) -> u64 {
        self.transfer.saturating_sub(self.cash)
    }
}
