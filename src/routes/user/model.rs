use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Course, Database, Role, User};

/// 对外展示的用户信息，不含哈希和盐
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: Role,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub active: bool,
    pub failed_attempts: u32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            email: user.email.clone(),
            phone: user.phone.clone(),
            active: user.active,
            failed_attempts: user.failed_attempts,
            locked_until: user.locked_until,
            last_login: user.last_login,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: String,
    pub code: String,
    pub name: String,
    pub credits: f32,
    pub teacher_name: Option<String>,
    /// 学生本人的成绩；教师视角下为空
    pub score: Option<f32>,
    pub student_count: usize,
}

impl CourseSummary {
    pub fn new(course: &Course, db: &Database, student_id: Option<&str>) -> Self {
        Self {
            id: course.id.clone(),
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits,
            teacher_name: course
                .teacher_id
                .as_deref()
                .and_then(|id| db.find_user(id))
                .map(|t| t.name.clone()),
            score: student_id.and_then(|id| course.score_of(id)),
            student_count: course.enrollments.len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserProfile,
    pub courses: Vec<CourseSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetPasswordRequest {
    /// 为空时使用系统默认密码
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub active: bool,
}
