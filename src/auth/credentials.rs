//! 管理员对凭据的维护：创建、重置、解锁、删除

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{Database, LogAction, NewUser, Role, User};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_PASSWORD_LEN: usize = 24;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("user {0} not found")]
    NotFound(String),
    #[error("user {username} already exists as {role}")]
    Duplicate { username: String, role: Role },
    #[error("{0}")]
    Validation(String),
}

/// 删除用户时级联清理的结果
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub courses_unassigned: usize,
    pub enrollments_removed: usize,
}

pub fn validate_username(username: &str) -> Result<(), CredentialError> {
    if username.is_empty() || username.len() > 32 {
        return Err(CredentialError::Validation(
            "用户名长度必须在1到32个字符之间".into(),
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(CredentialError::Validation(
            "用户名格式无效，只允许使用字母、数字和下划线".into(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CredentialError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(CredentialError::Validation(format!(
            "密码长度必须在{MIN_PASSWORD_LEN}到{MAX_PASSWORD_LEN}个字符之间"
        )));
    }
    Ok(())
}

/// 新建用户，同一角色下用户名唯一
pub fn create_user(
    db: &mut Database,
    req: NewUser,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<User, CredentialError> {
    validate_username(&req.username)?;
    validate_password(&req.password)?;
    if req.name.trim().is_empty() {
        return Err(CredentialError::Validation("姓名不能为空".into()));
    }

    if db.find_by_login(&req.username, req.role).is_some() {
        return Err(CredentialError::Duplicate {
            username: req.username,
            role: req.role,
        });
    }

    let user = User::new(req, now);
    tracing::info!("Created user {} ({})", user.username, user.role);
    db.append_log(
        actor,
        LogAction::UserCreated,
        format!("创建{} {}", user.role.label(), user.username),
    );
    db.users.push(user.clone());
    Ok(user)
}

/// 重置密码，未提供新密码时使用系统默认密码；同时解除锁定
pub fn reset_password(
    db: &mut Database,
    user_id: &str,
    new_password: Option<&str>,
    actor: &str,
) -> Result<(), CredentialError> {
    let password = match new_password {
        Some(p) => {
            validate_password(p)?;
            p.to_string()
        }
        None => db.settings.default_password.clone(),
    };

    let user = db
        .find_user_mut(user_id)
        .ok_or_else(|| CredentialError::NotFound(user_id.to_string()))?;
    user.set_password(&password);
    let username = user.username.clone();

    db.append_log(actor, LogAction::PasswordReset, format!("重置 {username} 的密码"));
    Ok(())
}

pub fn unlock(db: &mut Database, user_id: &str, actor: &str) -> Result<(), CredentialError> {
    let user = db
        .find_user_mut(user_id)
        .ok_or_else(|| CredentialError::NotFound(user_id.to_string()))?;
    user.clear_lock();
    let username = user.username.clone();

    db.append_log(actor, LogAction::UserUnlocked, format!("解锁 {username}"));
    Ok(())
}

/// 启用或停用账号；停用后该账号的登录和已签发的令牌都会被拒绝
pub fn set_active(
    db: &mut Database,
    user_id: &str,
    active: bool,
    actor_id: &str,
    actor: &str,
) -> Result<(), CredentialError> {
    if user_id == actor_id && !active {
        return Err(CredentialError::Validation("不能停用当前登录的账号".into()));
    }

    let user = db
        .find_user_mut(user_id)
        .ok_or_else(|| CredentialError::NotFound(user_id.to_string()))?;
    user.active = active;
    let username = user.username.clone();

    let verb = if active { "启用" } else { "停用" };
    tracing::info!("User {} {} by {}", username, if active { "enabled" } else { "disabled" }, actor);
    db.append_log(actor, LogAction::UserStatusChanged, format!("{verb} {username}"));
    Ok(())
}

/// 硬删除用户，并尽量清理课程中引用它的记录
pub fn delete_user(
    db: &mut Database,
    user_id: &str,
    actor_id: &str,
    actor: &str,
) -> Result<DeleteSummary, CredentialError> {
    if user_id == actor_id {
        return Err(CredentialError::Validation("不能删除当前登录的账号".into()));
    }

    let index = db
        .users
        .iter()
        .position(|u| u.id == user_id)
        .ok_or_else(|| CredentialError::NotFound(user_id.to_string()))?;
    let removed = db.users.remove(index);

    let mut summary = DeleteSummary::default();
    for course in &mut db.courses {
        if course.teacher_id.as_deref() == Some(user_id) {
            course.teacher_id = None;
            summary.courses_unassigned += 1;
        }
        let before = course.enrollments.len();
        course.enrollments.retain(|e| e.student_id != user_id);
        summary.enrollments_removed += before - course.enrollments.len();
    }

    tracing::info!(
        "Deleted user {} ({} courses unassigned, {} enrollments removed)",
        removed.username,
        summary.courses_unassigned,
        summary.enrollments_removed
    );
    db.append_log(
        actor,
        LogAction::UserDeleted,
        format!("删除{} {}", removed.role.label(), removed.username),
    );
    Ok(summary)
}
