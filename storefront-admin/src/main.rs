use std::sync::Arc;

use anyhow::Context;
use storefront_admin::{AppContext, RedbKv, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 工作目录, 日志)
    let config = setup_environment().context("failed to prepare environment")?;

    tracing::info!(context_id = %config.context_id, work_dir = %config.work_dir, "Storefront admin starting...");

    // 2. 打开 KV 存储
    let db_path = config.database_path();
    let kv = RedbKv::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    // 3. 初始化应用上下文 (store + 持久化 + 同步)
    let ctx = AppContext::initialize(config, Arc::new(kv)).await;

    let stats = ctx.store.state().stats();
    tracing::info!(
        zones = stats.zones,
        active_zones = stats.active_zones,
        novels = stats.novels,
        chapters = stats.total_chapters,
        "Configuration ready"
    );

    // 4. 等待 Ctrl-C
    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;

    ctx.shutdown().await;
    tracing::info!("Storefront admin stopped");
    Ok(())
}
