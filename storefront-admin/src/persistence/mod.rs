//! Persistence
//!
//! - [`KeyValueStore`] - get/set collaborator with a change feed
//! - [`MemoryKv`] / [`RedbKv`] - in-process and durable implementations
//! - [`PersistenceBridge`] - snapshot load/save, export/import
//! - [`PersistenceWorker`] - debounced write-back of store changes

mod bridge;
mod kv;
mod memory;
mod redb_kv;
mod worker;

pub use bridge::*;
pub use kv::*;
pub use memory::MemoryKv;
pub use redb_kv::RedbKv;
pub use worker::PersistenceWorker;
