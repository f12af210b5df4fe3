//! Configuration store
//!
//! - [`AdminState`] - immutable projection (pricing, zones, novels, notifications)
//! - [`AdminAction`] / [`reduce`] - the only way state changes
//! - [`AdminStore`] - holds the current reference and notifies observers

pub mod action;
pub mod defaults;
pub mod manager;
pub mod observer;
pub mod reducer;
pub mod state;

pub use action::{AdminAction, LoadSource};
pub use defaults::default_config;
pub use manager::{AdminStore, Credentials};
pub use observer::{ChangeOrigin, ChannelObserver, StateChange, StoreObserver};
pub use reducer::reduce;
pub use state::{AdminState, AdminStats, DEFAULT_NOTIFICATION_LIMIT};
