use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password::hash_password;

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    /// 界面和导入模板中使用的中文名称
    pub fn label(self) -> &'static str {
        match self {
            Role::Student => "学生",
            Role::Teacher => "教师",
            Role::Admin => "管理员",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "学生" => Ok(Role::Student),
            "教师" | "老师" => Ok(Role::Teacher),
            "管理员" | "系统管理员" => Ok(Role::Admin),
            other => match other.to_ascii_lowercase().as_str() {
                "student" => Ok(Role::Student),
                "teacher" => Ok(Role::Teacher),
                "admin" => Ok(Role::Admin),
                _ => Err(UnknownRole(other.to_string())),
            },
        }
    }
}

/// 用户记录，凭据和锁定状态都保存在这里
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    /// 显示名称
    pub name: String,
    pub role: Role,
    pub password_hash: String,
    /// 旧版本数据中单独保存的盐；新记录固定为用户名
    #[serde(default)]
    pub salt: Option<String>,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default)]
    pub locked_until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

/// 创建用户所需的字段
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub name: String,
    pub role: Role,
    pub password: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl User {
    /// 按规范的加盐方式（盐为用户名）创建新记录
    pub fn new(req: NewUser, now: DateTime<Utc>) -> Self {
        let password_hash = hash_password(&req.password, &req.username);
        Self {
            id: Uuid::new_v4().to_string(),
            salt: Some(req.username.clone()),
            username: req.username,
            name: req.name,
            role: req.role,
            password_hash,
            failed_attempts: 0,
            locked_until: None,
            last_login: None,
            active: true,
            email: req.email.filter(|e| !e.is_empty()),
            phone: req.phone.filter(|p| !p.is_empty()),
            created_at: now,
        }
    }

    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// 写入规范的哈希并清除锁定状态
    pub fn set_password(&mut self, password: &str) {
        self.password_hash = hash_password(password, &self.username);
        self.salt = Some(self.username.clone());
        self.clear_lock();
    }

    pub fn clear_lock(&mut self) {
        self.failed_attempts = 0;
        self.locked_until = None;
    }
}
