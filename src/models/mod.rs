mod backup;
mod course;
mod log;
mod settings;
pub mod user;

use serde::{Deserialize, Serialize};

pub use backup::{Backup, BackupSnapshot, BackupSummary};
pub use course::{Course, Enrollment};
pub use log::{LogAction, LogEntry};
pub use settings::Settings;
pub use user::{NewUser, Role, User};

/// 日志最多保留条数
pub const MAX_LOG_ENTRIES: usize = 1000;

/// 持久化的整个数据文档
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub backups: Vec<Backup>,
    #[serde(default)]
    pub settings: Settings,
}

impl Database {
    pub fn find_user(&self, user_id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    pub fn find_user_mut(&mut self, user_id: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == user_id)
    }

    pub fn find_by_login(&self, username: &str, role: Role) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.role == role)
    }

    /// 追加一条操作日志，超出上限时丢弃最旧的记录
    pub fn append_log(&mut self, actor: &str, action: LogAction, detail: impl Into<String>) {
        self.logs.push(LogEntry::new(actor, action, detail));
        if self.logs.len() > MAX_LOG_ENTRIES {
            let overflow = self.logs.len() - MAX_LOG_ENTRIES;
            self.logs.drain(..overflow);
        }
    }

    /// 最新的日志在前
    pub fn recent_logs(&self, limit: usize) -> Vec<LogEntry> {
        self.logs.iter().rev().take(limit).cloned().collect()
    }

    /// 学生选修的课程
    pub fn courses_enrolled(&self, student_id: &str) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| c.enrollments.iter().any(|e| e.student_id == student_id))
            .collect()
    }

    /// 教师讲授的课程
    pub fn courses_taught(&self, teacher_id: &str) -> Vec<&Course> {
        self.courses
            .iter()
            .filter(|c| c.teacher_id.as_deref() == Some(teacher_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_capped_and_newest_first() {
        let mut db = Database::default();
        for i in 0..MAX_LOG_ENTRIES + 5 {
            db.append_log("system", LogAction::Login, format!("entry {i}"));
        }

        assert_eq!(db.logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(db.logs[0].detail, "entry 5");

        let recent = db.recent_logs(2);
        assert_eq!(recent[0].detail, format!("entry {}", MAX_LOG_ENTRIES + 4));
        assert_eq!(recent[1].detail, format!("entry {}", MAX_LOG_ENTRIES + 3));
    }

    #[test]
    fn missing_sections_default_when_deserializing() {
        let db: Database = serde_json::from_str(r#"{"users": []}"#).unwrap();
        assert!(db.courses.is_empty());
        assert_eq!(db.settings.max_login_attempts, Settings::default().max_login_attempts);
    }
}
