//! Novel (novela) Catalog Model

use serde::{Deserialize, Serialize};

/// 播出状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelStatus {
    /// 播出中
    Transmision,
    /// 已完结
    #[default]
    Finalizada,
}

/// Novel entity (小说/电视剧目录条目)
///
/// `cash_cost` / `transfer_cost` 是保存时刻的价格快照：之后修改全局价格
/// 不会改变已保存的值，除非该条目被重新保存。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Novel {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "capitulos")]
    pub chapters: u32,
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "pais", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: NovelStatus,
    #[serde(default = "default_true")]
    pub active: bool,
    /// 现金价快照
    #[serde(rename = "costoEfectivo", default, skip_serializing_if = "Option::is_none")]
    pub cash_cost: Option<u64>,
    /// 转账价快照
    #[serde(rename = "costoTransferencia", default, skip_serializing_if = "Option::is_none")]
    pub transfer_cost: Option<u64>,
    /// Unix millis
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
    /// Unix millis
    #[serde(rename = "updatedAt", default)]
    pub updated_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create novel payload
///
/// `cash_cost` 显式给出时视为手动定价，优先于按集数计算的价格。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovelCreate {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "capitulos")]
    pub chapters: u32,
    #[serde(rename = "año")]
    pub year: i32,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "pais", default)]
    pub country: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: NovelStatus,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(rename = "costoEfectivo", default)]
    pub cash_cost: Option<u64>,
}

/// Update novel payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovelUpdate {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "genero")]
    pub genre: Option<String>,
    #[serde(rename = "capitulos")]
    pub chapters: Option<u32>,
    #[serde(rename = "año")]
    pub year: Option<i32>,
    #[serde(rename = "descripcion")]
    pub description: Option<String>,
    #[serde(rename = "pais")]
    pub country: Option<String>,
    #[serde(rename = "estado")]
    pub status: Option<NovelStatus>,
    pub active: Option<bool>,
    #[serde(rename = "costoEfectivo")]
    pub cash_cost: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_legacy_export_entry() {
        // Older exports carry neither timestamps nor the active flag
        let json = r#"{
            "id": 2,
            "titulo": "La Usurpadora",
            "genero": "Drama/Melodrama",
            "capitulos": 98,
            "año": 1998,
            "costoEfectivo": 490,
            "costoTransferencia": 539,
            "descripcion": "La historia de dos mujeres idénticas con destinos opuestos"
        }"#;
        let novel: Novel = serde_json::from_str(json).unwrap();
        assert_eq!(novel.chapters, 98);
        assert_eq!(novel.year, 1998);
        assert!(novel.active);
        assert_eq!(novel.status, NovelStatus::Finalizada);
        assert_eq!(novel.cash_cost, Some(490));
        assert_eq!(novel.created_at, 0);
    }
}
