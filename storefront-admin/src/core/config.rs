use std::path::PathBuf;
use std::time::Duration;

use crate::store::{Credentials, DEFAULT_NOTIFICATION_LIMIT};
use crate::sync::SyncSettings;

/// 管理端配置 - 一个浏览上下文的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 (redb 文件、日志) |
/// | CONTEXT_ID | 随机 UUID | 本上下文 ID (同步信封来源) |
/// | SYNC_POLL_INTERVAL_MS | 5000 | 对账轮询周期 |
/// | HEARTBEAT_INTERVAL_MS | 30000 | 心跳周期 |
/// | PERSIST_DEBOUNCE_MS | 300 | 持久化写回防抖窗口 |
/// | MAX_NOTIFICATIONS | 50 | 通知日志上限 |
/// | ADMIN_USERNAME | admin | 管理员用户名 |
/// | ADMIN_PASSWORD | admin | 管理员密码 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 设置后写入滚动日志文件 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/tmp/storefront CONTEXT_ID=tab-1 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    /// 本上下文 ID
    pub context_id: String,
    /// 对账轮询周期 (毫秒)
    pub sync_poll_interval_ms: u64,
    /// 心跳周期 (毫秒)
    pub heartbeat_interval_ms: u64,
    /// 持久化防抖 (毫秒)
    pub persist_debounce_ms: u64,
    /// 通知日志上限
    pub max_notifications: usize,
    pub admin_username: String,
    pub admin_password: String,
    pub log_level: String,
    pub log_dir: Option<String>,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置，未设置的项使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            context_id: std::env::var("CONTEXT_ID")
                .ok()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            sync_poll_interval_ms: env_or("SYNC_POLL_INTERVAL_MS", 5000),
            heartbeat_interval_ms: env_or("HEARTBEAT_INTERVAL_MS", 30000),
            persist_debounce_ms: env_or("PERSIST_DEBOUNCE_MS", 300),
            max_notifications: env_or("MAX_NOTIFICATIONS", DEFAULT_NOTIFICATION_LIMIT),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, context_id: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.context_id = context_id.into();
        config
    }

    /// redb 数据库文件路径
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("storefront.redb")
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.admin_username, &self.admin_password)
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings {
            context_id: self.context_id.clone(),
            poll_interval: Duration::from_millis(self.sync_poll_interval_ms.max(1)),
            heartbeat_interval: Duration::from_millis(self.heartbeat_interval_ms.max(1)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_and_derived_values() {
        let mut config = Config::with_overrides("/tmp/storefront", "tab-1");
        config.sync_poll_interval_ms = 0;
        assert_eq!(config.context_id, "tab-1");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/storefront").join("storefront.redb")
        );
        let settings = config.sync_settings();
        assert_eq!(settings.context_id, "tab-1");
        assert_eq!(settings.poll_interval, Duration::from_millis(1));
    }
}
