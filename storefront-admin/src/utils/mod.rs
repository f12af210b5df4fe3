//! 工具模块

pub mod logger;

pub use shared::error::{AppError, AppResult, ErrorCode};
