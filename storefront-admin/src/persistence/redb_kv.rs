//! redb-backed key-value store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `kv` | `&str` | `&str` | Snapshot and sync channel entries |
//!
//! redb calls are blocking; every operation runs on the blocking pool.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use tokio::sync::broadcast;

use super::kv::{CHANGE_FEED_CAPACITY, KeyValueStore, KvResult};

const KV_TABLE: TableDefinition<&str, &str> = TableDefinition::new("kv");

#[derive(Clone)]
pub struct RedbKv {
    db: Arc<Database>,
    changes: broadcast::Sender<String>,
}

impl RedbKv {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> KvResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> KvResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;

        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Ok(Self {
            db: Arc::new(db),
            changes,
        })
    }
}

#[async_trait]
impl KeyValueStore for RedbKv {
    async fn get(&self, key: &str) -> KvResult<Option<String>> {
        let db = Arc::clone(&self.db);
        let key = key.to_string();
        tokio::task::spawn_blocking(move || -> KvResult<Option<String>> {
            let read_txn = db.begin_read()?;
            let table = read_txn.open_table(KV_TABLE)?;
            Ok(table.get(key.as_str())?.map(|guard| guard.value().to_string()))
        })
        .await?
    }

    async fn set(&self, key: &str, value: String) -> KvResult<()> {
        let db = Arc::clone(&self.db);
        let owned_key = key.to_string();
        tokio::task::spawn_blocking(move || -> KvResult<()> {
            let write_txn = db.begin_write()?;
            {
                let mut table = write_txn.open_table(KV_TABLE)?;
                table.insert(owned_key.as_str(), value.as_str())?;
            }
            write_txn.commit()?;
            Ok(())
        })
        .await??;

        let _ = self.changes.send(key.to_string());
        Ok(())
    }

    fn watch(&self) -> broadcast::Receiver<String> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_roundtrip() {
        let kv = RedbKv::open_in_memory().unwrap();
        let mut feed = kv.watch();
        assert_eq!(kv.get("adminConfig").await.unwrap(), None);

        kv.set("adminConfig", r#"{"a":1}"#.into()).await.unwrap();
        kv.set("adminConfig", r#"{"a":2}"#.into()).await.unwrap();
        assert_eq!(kv.get("adminConfig").await.unwrap().as_deref(), Some(r#"{"a":2}"#));
        assert_eq!(feed.recv().await.unwrap(), "adminConfig");
    }

    #[tokio::test]
    async fn test_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.redb");
        {
            let kv = RedbKv::open(&path).unwrap();
            kv.set("admin_sync_channel", "payload".into()).await.unwrap();
        }
        let kv = RedbKv::open(&path).unwrap();
        assert_eq!(
            kv.get("admin_sync_channel").await.unwrap().as_deref(),
            Some("payload")
        );
    }
}
