//! Shared types for the storefront admin
//!
//! Domain models, the cross-context sync envelope, error types and small
//! utilities used by every consumer of the admin store.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
