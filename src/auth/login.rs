use chrono::{DateTime, Utc};
use thiserror::Error;

use super::password::{SaltScheme, verify_password};
use crate::models::{Database, LogAction, Role, User};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,
    #[error("account is disabled")]
    Inactive,
    #[error("account locked until {until}")]
    Locked { until: DateTime<Utc> },
    #[error("invalid password, {remaining_attempts} attempts remaining")]
    InvalidPassword { remaining_attempts: u32 },
    #[error("lockout of {minutes} minutes is out of range")]
    LockoutOutOfRange { minutes: i64 },
}

/// 校验一次登录并就地更新失败计数、锁定时间和最后登录时间。
///
/// 失败也会修改记录，调用方无论结果如何都应持久化文档。
pub fn authenticate(
    db: &mut Database,
    username: &str,
    password: &str,
    role: Role,
    now: DateTime<Utc>,
) -> Result<User, AuthError> {
    let max_attempts = db.settings.max_login_attempts.max(1);
    let lockout_minutes = db.settings.lockout_minutes;
    let lock_until = db
        .settings
        .lockout_duration()
        .and_then(|lockout| now.checked_add_signed(lockout));

    let Some(user) = db
        .users
        .iter_mut()
        .find(|u| u.username == username && u.role == role)
    else {
        tracing::info!("Login rejected, unknown user {} ({})", username, role);
        db.append_log(username, LogAction::LoginFailed, format!("用户不存在 ({})", role.label()));
        return Err(AuthError::UserNotFound);
    };

    if !user.active {
        tracing::info!("Login rejected, user {} is disabled", username);
        return Err(AuthError::Inactive);
    }

    match user.locked_until {
        Some(until) if user.is_locked(now) => return Err(AuthError::Locked { until }),
        // 锁定已过期
        Some(_) => user.clear_lock(),
        None => {}
    }

    let scheme = match verify_password(user, password) {
        Some(scheme) => scheme,
        None => {
            user.failed_attempts += 1;
            let attempts = user.failed_attempts;

            if attempts >= max_attempts {
                let Some(until) = lock_until else {
                    tracing::error!(
                        "Lockout of {} minutes overflows, user {} not locked",
                        lockout_minutes,
                        username
                    );
                    return Err(AuthError::LockoutOutOfRange { minutes: lockout_minutes });
                };
                user.locked_until = Some(until);
                tracing::warn!("User {} locked until {} after {} failures", username, until, attempts);
                db.append_log(
                    username,
                    LogAction::AccountLocked,
                    format!("连续 {attempts} 次密码错误，锁定至 {until}"),
                );
                return Err(AuthError::Locked { until });
            }

            db.append_log(username, LogAction::LoginFailed, format!("密码错误，第 {attempts} 次"));
            return Err(AuthError::InvalidPassword {
                remaining_attempts: max_attempts - attempts,
            });
        }
    };

    user.clear_lock();
    user.last_login = Some(now);

    if scheme == SaltScheme::Legacy || user.salt.as_deref() != Some(user.username.as_str()) {
        tracing::debug!("Migrating user {} to username salt", username);
        user.set_password(password);
    }

    let user = user.clone();
    db.append_log(username, LogAction::Login, format!("{}登录", role.label()));
    Ok(user)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::auth::password::hash_password;
    use crate::models::NewUser;

    fn db_with_student(now: DateTime<Utc>) -> Database {
        let mut db = Database::default();
        db.users.push(User::new(
            NewUser {
                username: "student01".into(),
                name: "李明".into(),
                role: Role::Student,
                password: "secret1".into(),
                email: None,
                phone: None,
            },
            now,
        ));
        db
    }

    #[test]
    fn repeated_failures_lock_until_expiry() {
        let now = Utc::now();
        let mut db = db_with_student(now);
        let max = db.settings.max_login_attempts;

        for i in 1..max {
            let err = authenticate(&mut db, "student01", "wrong", Role::Student, now).unwrap_err();
            assert_eq!(err, AuthError::InvalidPassword { remaining_attempts: max - i });
        }

        let err = authenticate(&mut db, "student01", "wrong", Role::Student, now).unwrap_err();
        let until = now + db.settings.lockout_duration().unwrap();
        assert_eq!(err, AuthError::Locked { until });

        // 正确密码在锁定期内依然被拒绝
        let later = now + Duration::minutes(1);
        let err = authenticate(&mut db, "student01", "secret1", Role::Student, later).unwrap_err();
        assert_eq!(err, AuthError::Locked { until });

        // 锁定过期后可以登录
        let user = authenticate(&mut db, "student01", "secret1", Role::Student, until).unwrap();
        assert_eq!(user.failed_attempts, 0);
        assert!(user.locked_until.is_none());
    }

    #[test]
    fn correct_password_resets_failure_counter() {
        let now = Utc::now();
        let mut db = db_with_student(now);

        for _ in 0..2 {
            authenticate(&mut db, "student01", "wrong", Role::Student, now).unwrap_err();
        }
        assert_eq!(db.users[0].failed_attempts, 2);

        let user = authenticate(&mut db, "student01", "secret1", Role::Student, now).unwrap();
        assert_eq!(user.failed_attempts, 0);
        assert_eq!(user.last_login, Some(now));
        assert_eq!(db.users[0].failed_attempts, 0);
    }

    #[test]
    fn role_must_match() {
        let now = Utc::now();
        let mut db = db_with_student(now);
        let err = authenticate(&mut db, "student01", "secret1", Role::Admin, now).unwrap_err();
        assert_eq!(err, AuthError::UserNotFound);
    }

    #[test]
    fn inactive_user_is_rejected_without_counting() {
        let now = Utc::now();
        let mut db = db_with_student(now);
        db.users[0].active = false;

        let err = authenticate(&mut db, "student01", "wrong", Role::Student, now).unwrap_err();
        assert_eq!(err, AuthError::Inactive);
        assert_eq!(db.users[0].failed_attempts, 0);
    }

    #[test]
    fn legacy_salt_login_migrates_record() {
        let now = Utc::now();
        let mut db = db_with_student(now);
        db.users[0].salt = Some("s4lt".into());
        db.users[0].password_hash = hash_password("secret1", "s4lt");

        let user = authenticate(&mut db, "student01", "secret1", Role::Student, now).unwrap();
        assert_eq!(user.salt.as_deref(), Some("student01"));
        assert_eq!(user.password_hash, hash_password("secret1", "student01"));

        // 迁移后的记录用规范盐即可通过
        let user = &db.users[0];
        assert_eq!(verify_password(user, "secret1"), Some(SaltScheme::Canonical));
    }

    #[test]
    fn records_without_salt_field_are_stamped() {
        let now = Utc::now();
        let mut db = db_with_student(now);
        db.users[0].salt = None;

        let user = authenticate(&mut db, "student01", "secret1", Role::Student, now).unwrap();
        assert_eq!(user.salt.as_deref(), Some("student01"));
    }

    #[test]
    fn out_of_range_lockout_is_an_error_not_a_panic() {
        let now = Utc::now();
        let mut db = db_with_student(now);
        db.settings.max_login_attempts = 1;

        for minutes in [1_000_000_000_000, i64::MAX] {
            db.settings.lockout_minutes = minutes;
            db.users[0].clear_lock();

            let err = authenticate(&mut db, "student01", "wrong", Role::Student, now).unwrap_err();
            assert_eq!(err, AuthError::LockoutOutOfRange { minutes });
            assert!(db.users[0].locked_until.is_none());

            // 正确密码不受影响
            authenticate(&mut db, "student01", "secret1", Role::Student, now).unwrap();
        }
    }

    #[test]
    fn failures_and_locks_are_logged() {
        let now = Utc::now();
        let mut db = db_with_student(now);
        db.settings.max_login_attempts = 2;

        authenticate(&mut db, "student01", "wrong", Role::Student, now).unwrap_err();
        authenticate(&mut db, "student01", "wrong", Role::Student, now).unwrap_err();

        let actions: Vec<_> = db.logs.iter().map(|l| l.action).collect();
        assert_eq!(actions, vec![LogAction::LoginFailed, LogAction::AccountLocked]);
    }
}
