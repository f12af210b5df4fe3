//! Order Model
//!
//! 结账时生成，仅存在于当前会话，不持久化。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::pricing::ItemPrice;

/// 客户信息 (结账表单)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub full_name: String,
    pub phone: String,
    pub address: String,
}

/// 订单汇总 (按支付方式拆分)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// 现金商品合计
    pub cash_total: u64,
    /// 转账商品合计 (含附加费)
    pub transfer_total: u64,
    /// 附加费部分
    pub transfer_fee: u64,
    /// 配送费
    pub delivery_cost: u64,
    /// cash_total + transfer_total + delivery_cost
    pub grand_total: u64,
}

impl OrderTotals {
    /// 内容小计 (不含配送)
    pub fn subtotal(&self) -> u64 {
        self.cash_total.saturating_add(self.transfer_total)
    }
}

/// 订单行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item: CartItem,
    /// 两种支付方式下的价格
    pub price: ItemPrice,
    /// 按所选支付方式实际收取的金额
    pub charged: u64,
}

/// 已选配送区域
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderZone {
    pub id: i64,
    pub name: String,
    pub full_path: String,
}

/// Finalized order handed to checkout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub order_id: String,
    pub customer_info: CustomerInfo,
    /// None 表示区域 ID 未在区域表中找到 (配送费按 0 计)
    pub delivery_zone: Option<OrderZone>,
    pub delivery_zone_id: i64,
    pub items: Vec<OrderLine>,
    pub totals: OrderTotals,
    /// 下单时的转账附加费百分比
    pub transfer_fee_percentage: u32,
    pub created_at: DateTime<Utc>,
    /// 可直接粘贴到消息渠道的订单文本
    pub summary: String,
}

impl OrderData {
    pub fn has_transfer_items(&self) -> bool {
        self.items.iter().any(|line| line.item.is_transfer())
    }
}
