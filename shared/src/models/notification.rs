//! Notification Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// 通知严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
    Info,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Success => write!(f, "success"),
            NotificationLevel::Warning => write!(f, "warning"),
            NotificationLevel::Error => write!(f, "error"),
            NotificationLevel::Info => write!(f, "info"),
        }
    }
}

/// 管理面板分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Prices,
    Zones,
    Novels,
    Auth,
    Backup,
    Sync,
    System,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Section::Prices => "Precios",
            Section::Zones => "Zonas de Entrega",
            Section::Novels => "Gestión de Novelas",
            Section::Auth => "Autenticación",
            Section::Backup => "Sistema de Backup",
            Section::Sync => "Sincronización",
            Section::System => "Sistema",
        };
        f.write_str(label)
    }
}

/// Notification entity (操作日志条目)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(rename = "type")]
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub section: Section,
    /// 动作标签 (create / update / delete / ...)
    pub action: String,
    /// Unix millis
    pub timestamp: i64,
}

/// 尚未分配 id 和时间戳的通知
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    #[serde(rename = "type")]
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub section: Section,
    pub action: String,
}

impl NotificationDraft {
    pub fn new(
        level: NotificationLevel,
        section: Section,
        action: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            section,
            action: action.into(),
        }
    }

    pub fn success(
        section: Section,
        action: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(NotificationLevel::Success, section, action, title, message)
    }

    pub fn warning(
        section: Section,
        action: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(NotificationLevel::Warning, section, action, title, message)
    }

    pub fn error(
        section: Section,
        action: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(NotificationLevel::Error, section, action, title, message)
    }

    pub fn info(
        section: Section,
        action: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(NotificationLevel::Info, section, action, title, message)
    }

    /// 分配 id 和时间戳
    pub fn into_notification(self, id: u64, timestamp: i64) -> Notification {
        Notification {
            id,
            level: self.level,
            title: self.title,
            message: self.message,
            section: self.section,
            action: self.action,
            timestamp,
        }
    }
}
