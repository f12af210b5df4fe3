//! Storefront Admin - 店面管理配置存储与跨上下文同步
//!
//! # 架构概述
//!
//! - **定价** (`pricing`): 现金/转账价格与订单汇总 (纯函数)
//! - **配置存储** (`store`): 纯 reducer + 持有当前状态引用的 store
//! - **持久化** (`persistence`): KV 协作者、快照加载/保存、导入导出
//! - **同步** (`sync`): 共享通道广播、推送监听、对账轮询、心跳
//! - **结账** (`orders`): 订单校验、汇总文本、小说目录消息
//!
//! # 模块结构
//!
//! ```text
//! storefront-admin/src/
//! ├── core/          # 配置、应用上下文、后台任务
//! ├── pricing/       # 定价引擎
//! ├── store/         # 配置存储
//! ├── persistence/   # 持久化桥
//! ├── sync/          # 跨上下文同步
//! ├── orders/        # 订单组装
//! └── utils/         # 日志、错误
//! ```

pub mod core;
pub mod orders;
pub mod persistence;
pub mod pricing;
pub mod store;
pub mod sync;
pub mod utils;

// Re-export 公共类型
pub use core::{AppContext, BackgroundTasks, Config, TaskKind};
pub use persistence::{KeyValueStore, MemoryKv, PersistenceBridge, RedbKv};
pub use store::{AdminAction, AdminState, AdminStore};
pub use sync::{KvSyncChannel, SyncManager};
pub use utils::{AppError, AppResult, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv、工作目录、日志)，返回加载的配置
pub fn setup_environment() -> std::io::Result<Config> {
    let _ = dotenv::dotenv();
    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(config)
}
