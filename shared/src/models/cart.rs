//! Cart Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// 支付方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// 现金
    #[default]
    Cash,
    /// 转账 (带附加费)
    Transfer,
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Cash => write!(f, "cash"),
            PaymentType::Transfer => write!(f, "transfer"),
        }
    }
}

/// 内容类型 - 每个变体只携带自己需要的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CartItemKind {
    Movie,
    Series {
        /// 已选季号，空表示按 1 季计价
        #[serde(rename = "selectedSeasons", default)]
        selected_seasons: Vec<u32>,
    },
}

impl CartItemKind {
    /// 计价季数 (剧集至少 1 季)
    pub fn billable_seasons(&self) -> u64 {
        match self {
            CartItemKind::Movie => 1,
            CartItemKind::Series { selected_seasons } => selected_seasons.len().max(1) as u64,
        }
    }
}

/// Cart item (客户端会话级，不持久化)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// 内容 ID (电影/剧集)
    pub id: i64,
    pub title: String,
    pub kind: CartItemKind,
    pub payment_type: PaymentType,
}

impl CartItem {
    pub fn movie(id: i64, title: impl Into<String>, payment_type: PaymentType) -> Self {
        Self {
            id,
            title: title.into(),
            kind: CartItemKind::Movie,
            payment_type,
        }
    }

    pub fn series(
        id: i64,
        title: impl Into<String>,
        selected_seasons: Vec<u32>,
        payment_type: PaymentType,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            kind: CartItemKind::Series { selected_seasons },
            payment_type,
        }
    }

    pub fn is_transfer(&self) -> bool {
        self.payment_type == PaymentType::Transfer
    }
}

/// 小说选择 (小说目录下单)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelSelection {
    pub novel_id: i64,
    pub payment_type: PaymentType,
}
