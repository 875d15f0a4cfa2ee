use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogAction {
    Login,
    LoginFailed,
    AccountLocked,
    UserCreated,
    UserDeleted,
    PasswordReset,
    UserUnlocked,
    UserStatusChanged,
    UsersImported,
    BackupCreated,
    BackupRestored,
    SettingsUpdated,
}

/// 操作日志
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// 操作者用户名，系统操作为 "system"
    pub actor: String,
    pub action: LogAction,
    #[serde(default)]
    pub detail: String,
}

impl LogEntry {
    pub fn new(actor: &str, action: LogAction, detail: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            actor: actor.to_string(),
            action,
            detail: detail.into(),
        }
    }
}
