//! Key-value collaborator contract
//!
//! Fixed string keys, string values, overwrite semantics. Every successful
//! `set` is announced on the change feed so other contexts sharing the store
//! learn about it without polling.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

/// Change feed capacity (keys, not values)
pub const CHANGE_FEED_CAPACITY: usize = 256;

/// Key-value store errors
#[derive(Debug, Error)]
pub enum KvError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type KvResult<T> = Result<T, KvError>;

impl From<KvError> for shared::AppError {
    fn from(err: KvError) -> Self {
        shared::AppError::persistence(err.to_string())
    }
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> KvResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> KvResult<()>;

    /// Feed of keys written through any handle of this store
    fn watch(&self) -> broadcast::Receiver<String>;
}
