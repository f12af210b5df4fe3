//! 核心模块 - 配置、应用上下文、后台任务
//!
//! - [`Config`] - 环境变量配置
//! - [`AppContext`] - 一个浏览上下文的服务集合
//! - [`BackgroundTasks`] - 后台任务注册与关闭

pub mod config;
pub mod context;
pub mod tasks;

pub use config::Config;
pub use context::AppContext;
pub use tasks::{BackgroundTasks, TaskKind};
