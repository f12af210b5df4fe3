// shared/src/models/sync.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use super::snapshot::ConfigSnapshot;

/// 信封排序键
///
/// 先比较时间戳，时间戳相同时按来源上下文 ID 的字典序比较，
/// 保证任意两个不同来源的信封之间都有确定的先后。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnvelopeKey {
    pub timestamp: i64,
    pub source: String,
}

/// 信封内容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum SyncBody {
    /// 配置变更 (完整快照)
    StateUpdate(ConfigSnapshot),
    /// 模拟的在线心跳
    Heartbeat(Heartbeat),
}

impl SyncBody {
    pub fn kind(&self) -> &'static str {
        match self {
            SyncBody::StateUpdate(_) => "state_update",
            SyncBody::Heartbeat(_) => "heartbeat",
        }
    }
}

/// 心跳负载
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Heartbeat {
    pub online: bool,
    pub pending_changes: u32,
}

/// 跨上下文传播用的传输包装，本身不是领域数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEnvelope {
    /// 发送方上下文 ID
    pub source: String,
    /// Unix millis, 每个上下文内单调递增
    pub timestamp: i64,
    pub body: SyncBody,
}

impl SyncEnvelope {
    pub fn new(source: impl Into<String>, timestamp: i64, body: SyncBody) -> Self {
        Self {
            source: source.into(),
            timestamp,
            body,
        }
    }

    pub fn key(&self) -> EnvelopeKey {
        EnvelopeKey {
            timestamp: self.timestamp,
            source: self.source.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl fmt::Display for SyncEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}#{}", self.body.kind(), self.source, self.timestamp)
    }
}

/// 同步状态投影 (仅供观察，不影响数据路径)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_online: bool,
    /// 最近一次成功同步 (Unix millis)
    pub last_sync: Option<i64>,
    /// 尚未成功广播的本地变更数
    pub pending_changes: u32,
}
