use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Course, Settings, User};

/// 备份时保存的数据，不包含日志和备份本身
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSnapshot {
    pub users: Vec<User>,
    pub courses: Vec<Course>,
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub note: String,
    pub snapshot: BackupSnapshot,
}

/// 备份列表展示用，不带快照内容
#[derive(Debug, Clone, Serialize)]
pub struct BackupSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub note: String,
    pub user_count: usize,
    pub course_count: usize,
}

impl From<&Backup> for BackupSummary {
    fn from(backup: &Backup) -> Self {
        Self {
            id: backup.id.clone(),
            created_at: backup.created_at,
            created_by: backup.created_by.clone(),
            note: backup.note.clone(),
            user_count: backup.snapshot.users.len(),
            course_count: backup.snapshot.courses.len(),
        }
    }
}
