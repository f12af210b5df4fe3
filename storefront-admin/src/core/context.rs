use std::sync::Arc;

use shared::models::{NotificationDraft, Section};

use crate::core::{BackgroundTasks, Config, TaskKind};
use crate::persistence::{ImportError, KeyValueStore, PersistenceBridge, PersistenceWorker};
use crate::store::{AdminStore, ChannelObserver, LoadSource};
use crate::sync::{KvSyncChannel, SyncManager};

/// 应用上下文 - 一个浏览上下文持有的全部服务
///
/// 进程启动时显式构造一次，再把 store / sync 句柄传给各个使用方，
/// 不依赖任何全局单例。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | store | AdminStore | 配置存储 |
/// | bridge | PersistenceBridge | 持久化桥 |
/// | sync | SyncManager | 跨上下文同步 |
pub struct AppContext {
    pub config: Config,
    pub store: AdminStore,
    pub bridge: PersistenceBridge,
    pub sync: SyncManager,
    tasks: BackgroundTasks,
}

impl AppContext {
    /// 初始化上下文
    ///
    /// 按顺序：
    /// 1. 从 KV 加载配置快照 (缺失或无效时使用默认配置)
    /// 2. 注册持久化写回工作者
    /// 3. 启动同步管理器 (推送、监听、轮询、心跳)
    pub async fn initialize(config: Config, kv: Arc<dyn KeyValueStore>) -> Self {
        let bridge = PersistenceBridge::new(Arc::clone(&kv));
        let store = AdminStore::with_defaults(config.max_notifications, config.credentials());

        // 1. Load before any observer is attached: startup state is neither saved back nor broadcast
        match bridge.load().await {
            Some(snapshot) => store.load_state(snapshot, LoadSource::Startup),
            None => {
                if let Err(e) = bridge.save(&store.snapshot()).await {
                    tracing::error!(error = %e, "Failed to persist default configuration");
                    store.notify(NotificationDraft::error(
                        Section::System,
                        "persist",
                        "Error al guardar",
                        format!("No se pudo guardar la configuración inicial: {e}"),
                    ));
                }
            }
        }

        let mut tasks = BackgroundTasks::new();

        // 2. Persistence write-back
        let (persist_observer, persist_rx) = ChannelObserver::new();
        store.add_observer(Arc::new(persist_observer));
        let worker = PersistenceWorker::new(
            store.clone(),
            bridge.clone(),
            persist_rx,
            config.persist_debounce(),
            tasks.shutdown_token(),
        );
        tasks.spawn("persistence_worker", TaskKind::Worker, worker.run());

        // 3. Cross-context sync
        let channel = Arc::new(KvSyncChannel::new(kv));
        let sync = SyncManager::new(store.clone(), channel, config.sync_settings());
        sync.start(&mut tasks).await;

        tasks.log_summary();
        tracing::info!(context_id = %config.context_id, "Application context ready");

        Self {
            config,
            store,
            bridge,
            sync,
            tasks,
        }
    }

    /// 导出当前配置
    pub fn export_config(&self) -> serde_json::Result<String> {
        PersistenceBridge::export_config(&self.store)
    }

    /// 导入配置 (校验失败时 store 不变)
    pub fn import_config(&self, raw: &str) -> Result<(), ImportError> {
        PersistenceBridge::import_config(&self.store, raw)
    }

    /// 异常结束的后台任务数量
    pub fn check_health(&self) -> usize {
        self.tasks.check_health()
    }

    /// 取消所有后台任务并等待退出 (持久化工作者会先写回未保存的变更)
    pub async fn shutdown(self) {
        tracing::info!(context_id = %self.config.context_id, "Shutting down application context");
        self.tasks.shutdown().await;
    }
}
