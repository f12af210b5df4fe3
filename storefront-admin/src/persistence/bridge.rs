//! Persistence bridge
//!
//! Moves whole configuration snapshots between the store and the key-value
//! collaborator, and converts them to/from the export file format.
//!
//! Export document layout:
//!
//! ```text
//! {
//!   "pricing":       { moviePrice, seriesPrice, transferFeePercentage, novelPricePerChapter },
//!   "novelas":       [ ... ],
//!   "deliveryZones": [ ... ],
//!   "exportInfo":    { timestamp, version, description }
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::pricing::MAX_TRANSFER_FEE_PERCENTAGE;
use shared::models::ConfigSnapshot;
use thiserror::Error;
use tracing::{info, warn};

use super::kv::{KeyValueStore, KvResult};
use crate::store::{AdminStore, LoadSource};

/// Key holding the full configuration snapshot
pub const SNAPSHOT_KEY: &str = "adminConfig";

/// Export schema version
pub const EXPORT_VERSION: &str = "1.0";

const EXPORT_DESCRIPTION: &str = "Configuración del panel de administración TV a la Carta";

/// Rejections of an import payload (or of a stored snapshot)
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Malformed JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Top level must be an object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Field {0} must be an array")]
    NotAnArray(&'static str),

    #[error("Invalid pricing: {0}")]
    InvalidPricing(String),

    #[error("Invalid entry: {0}")]
    InvalidEntry(#[source] serde_json::Error),
}

impl From<ImportError> for shared::AppError {
    fn from(err: ImportError) -> Self {
        shared::AppError::invalid(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportInfo {
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(flatten)]
    pub config: ConfigSnapshot,
    #[serde(rename = "exportInfo")]
    pub export_info: ExportInfo,
}

/// Structural validation, then typed decoding
///
/// Requires `pricing` (object with numeric `moviePrice`, `seriesPrice` or
/// `seriesPricePerSeason`, `transferFeePercentage` within 0-100), plus
/// `novelas` and `deliveryZones` arrays. Anything else is ignored.
pub fn parse_snapshot(raw: &str) -> Result<ConfigSnapshot, ImportError> {
    let value: Value = serde_json::from_str(raw).map_err(ImportError::Malformed)?;
    let object = value.as_object().ok_or(ImportError::NotAnObject)?;

    let pricing = object.get("pricing").ok_or(ImportError::MissingField("pricing"))?;
    validate_pricing(pricing)?;

    for field in ["novelas", "deliveryZones"] {
        match object.get(field) {
            None => return Err(ImportError::MissingField(field)),
            Some(v) if !v.is_array() => return Err(ImportError::NotAnArray(field)),
            Some(_) => {}
        }
    }

    serde_json::from_value(value).map_err(ImportError::InvalidEntry)
}

fn validate_pricing(pricing: &Value) -> Result<(), ImportError> {
    let numeric = |name: &str| pricing.get(name).and_then(Value::as_u64);

    numeric("moviePrice")
        .ok_or_else(|| ImportError::InvalidPricing("moviePrice must be a non-negative integer".into()))?;
    numeric("seriesPrice")
        .or_else(|| numeric("seriesPricePerSeason"))
        .ok_or_else(|| ImportError::InvalidPricing("seriesPrice must be a non-negative integer".into()))?;
    let fee = numeric("transferFeePercentage").ok_or_else(|| {
        ImportError::InvalidPricing("transferFeePercentage must be a non-negative integer".into())
    })?;
    if fee > u64::from(MAX_TRANSFER_FEE_PERCENTAGE) {
        return Err(ImportError::InvalidPricing(format!(
            "transferFeePercentage must be between 0 and {MAX_TRANSFER_FEE_PERCENTAGE}, got {fee}"
        )));
    }
    if let Some(per_chapter) = pricing.get("novelPricePerChapter")
        && !per_chapter.is_null()
        && per_chapter.as_u64().is_none()
    {
        return Err(ImportError::InvalidPricing(
            "novelPricePerChapter must be a non-negative integer".into(),
        ));
    }
    Ok(())
}

/// Build the export document for a snapshot
pub fn export_document(config: &ConfigSnapshot, now: DateTime<Utc>) -> ExportDocument {
    ExportDocument {
        config: config.clone(),
        export_info: ExportInfo {
            timestamp: now,
            version: EXPORT_VERSION.to_string(),
            description: EXPORT_DESCRIPTION.to_string(),
        },
    }
}

#[derive(Clone)]
pub struct PersistenceBridge {
    kv: Arc<dyn KeyValueStore>,
}

impl PersistenceBridge {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Stored snapshot, or None when absent, unreadable or structurally invalid
    pub async fn load(&self) -> Option<ConfigSnapshot> {
        let raw = match self.kv.get(SNAPSHOT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("[Persistence] no stored configuration, using defaults");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "[Persistence] failed to read stored configuration");
                return None;
            }
        };

        match parse_snapshot(&raw) {
            Ok(snapshot) => {
                info!(
                    zones = snapshot.delivery_zones.len(),
                    novels = snapshot.novelas.len(),
                    "[Persistence] configuration loaded"
                );
                Some(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "[Persistence] stored configuration is invalid, using defaults");
                None
            }
        }
    }

    /// Full-snapshot overwrite
    pub async fn save(&self, snapshot: &ConfigSnapshot) -> KvResult<()> {
        let raw = serde_json::to_string(snapshot)?;
        self.kv.set(SNAPSHOT_KEY, raw).await
    }

    /// Serialized export of the store's current configuration
    pub fn export_config(store: &AdminStore) -> serde_json::Result<String> {
        let document = export_document(&store.state().config, Utc::now());
        serde_json::to_string_pretty(&document)
    }

    /// Validate and load an export document. Invalid payloads leave the store untouched.
    pub fn import_config(store: &AdminStore, raw: &str) -> Result<(), ImportError> {
        let snapshot = parse_snapshot(raw).inspect_err(|e| {
            warn!(error = %e, "[Persistence] import rejected");
        })?;
        store.load_state(snapshot, LoadSource::Import);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryKv;
    use crate::store::{Credentials, default_config};

    fn store() -> AdminStore {
        AdminStore::new(default_config(0), 50, Credentials::default())
    }

    #[test]
    fn test_export_carries_metadata() {
        let json = PersistenceBridge::export_config(&store()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["exportInfo"]["version"], "1.0");
        assert!(value["exportInfo"]["timestamp"].is_string());
        assert!(value["deliveryZones"].is_array());
        assert!(value["novelas"].is_array());
        assert_eq!(value["pricing"]["seriesPrice"], 300);
    }

    #[test]
    fn test_import_export_roundtrip() {
        let source = store();
        source.toggle_zone(3).unwrap();
        source.delete_novel(2);
        let json = PersistenceBridge::export_config(&source).unwrap();

        let target = store();
        target.delete_zone(4);
        PersistenceBridge::import_config(&target, &json).unwrap();
        assert_eq!(target.snapshot(), source.snapshot());
    }

    #[test]
    fn test_import_missing_zones_leaves_store_unchanged() {
        let store = store();
        let before = store.state();
        let payload = serde_json::json!({
            "pricing": { "moviePrice": 80, "seriesPrice": 300, "transferFeePercentage": 10 },
            "novelas": []
        });
        let err = PersistenceBridge::import_config(&store, &payload.to_string()).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("deliveryZones")));
        assert!(Arc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn test_import_rejects_bad_shapes() {
        let store = store();
        assert!(matches!(
            PersistenceBridge::import_config(&store, "not json"),
            Err(ImportError::Malformed(_))
        ));
        let payload = serde_json::json!({
            "pricing": { "moviePrice": 80, "seriesPrice": 300, "transferFeePercentage": 10 },
            "novelas": {},
            "deliveryZones": []
        });
        assert!(matches!(
            PersistenceBridge::import_config(&store, &payload.to_string()),
            Err(ImportError::NotAnArray("novelas"))
        ));
        let payload = serde_json::json!({
            "pricing": { "moviePrice": 80, "seriesPrice": 300, "transferFeePercentage": 140 },
            "novelas": [],
            "deliveryZones": []
        });
        assert!(matches!(
            PersistenceBridge::import_config(&store, &payload.to_string()),
            Err(ImportError::InvalidPricing(_))
        ));
        assert!(store.state().notifications.is_empty());
    }

    #[test]
    fn test_legacy_pricing_field_names() {
        let payload = serde_json::json!({
            "pricing": { "moviePrice": 90, "seriesPricePerSeason": 250, "transferFeePercentage": 5 },
            "novelas": [],
            "deliveryZones": []
        });
        let snapshot = parse_snapshot(&payload.to_string()).unwrap();
        assert_eq!(snapshot.pricing.series_price_per_season, 250);
        assert_eq!(snapshot.pricing.novel_price_per_chapter, 5);
    }

    #[tokio::test]
    async fn test_load_falls_back_on_invalid_snapshot() {
        let kv = Arc::new(MemoryKv::new());
        let bridge = PersistenceBridge::new(kv.clone());
        assert!(bridge.load().await.is_none());

        kv.set(SNAPSHOT_KEY, r#"{"pricing":{}}"#.into()).await.unwrap();
        assert!(bridge.load().await.is_none());

        let config = default_config(5);
        bridge.save(&config).await.unwrap();
        assert_eq!(bridge.load().await, Some(config));
    }
}
