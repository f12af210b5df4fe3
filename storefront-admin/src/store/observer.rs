//! Store observers
//!
//! Observers are notified after the store swapped its state reference.
//! They run on the dispatching thread with the dispatch lock held, so
//! `on_change` must not dispatch back into the store. Observers that need to
//! react forward the change to a task instead (see [`ChannelObserver`]).

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;

use super::state::AdminState;

/// 变更来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// 本上下文发起的动作
    Local,
    /// 应用其他上下文广播的快照 (不再转播)
    Remote,
}

impl fmt::Display for ChangeOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeOrigin::Local => write!(f, "local"),
            ChangeOrigin::Remote => write!(f, "remote"),
        }
    }
}

/// 一次状态引用替换
#[derive(Debug, Clone)]
pub struct StateChange {
    pub state: Arc<AdminState>,
    pub previous: Arc<AdminState>,
    pub origin: ChangeOrigin,
    /// 触发变更的动作名
    pub action: &'static str,
}

impl StateChange {
    /// 配置快照是否变化 (仅通知/登录类变更时为 false)
    pub fn config_changed(&self) -> bool {
        !Arc::ptr_eq(&self.state.config, &self.previous.config)
    }
}

pub trait StoreObserver: Send + Sync {
    fn on_change(&self, change: &StateChange);
}

impl<F> StoreObserver for F
where
    F: Fn(&StateChange) + Send + Sync,
{
    fn on_change(&self, change: &StateChange) {
        self(change)
    }
}

/// 把变更转发到 mpsc 通道，由后台任务异步处理
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<StateChange>,
}

impl ChannelObserver {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<StateChange>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl StoreObserver for ChannelObserver {
    fn on_change(&self, change: &StateChange) {
        // Receiver gone means the worker already shut down
        let _ = self.tx.send(change.clone());
    }
}
