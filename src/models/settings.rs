use chrono::Duration;
use serde::{Deserialize, Serialize};

/// 锁定时长和会话超时的上限：一年
pub const MAX_DURATION_MINUTES: i64 = 525_600;

/// 系统设置，随数据文档一起保存
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub system_name: String,
    /// 连续失败多少次后锁定
    pub max_login_attempts: u32,
    pub lockout_minutes: i64,
    /// 会话令牌有效期
    pub session_timeout_minutes: i64,
    /// 导入或重置时未提供密码所用的默认密码
    pub default_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            system_name: "教学成绩管理系统".to_string(),
            max_login_attempts: 5,
            lockout_minutes: 30,
            session_timeout_minutes: 30,
            default_password: "123456".to_string(),
        }
    }
}

impl Settings {
    /// 数据文件被手工改坏时可能越界，此时返回 None
    pub fn lockout_duration(&self) -> Option<Duration> {
        Duration::try_minutes(self.lockout_minutes)
    }

    pub fn session_timeout(&self) -> Option<Duration> {
        Duration::try_minutes(self.session_timeout_minutes)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_login_attempts == 0 {
            return Err("最大登录尝试次数必须大于0".into());
        }
        if !(1..=MAX_DURATION_MINUTES).contains(&self.lockout_minutes) {
            return Err(format!("锁定时长必须在1到{MAX_DURATION_MINUTES}分钟之间"));
        }
        if !(1..=MAX_DURATION_MINUTES).contains(&self.session_timeout_minutes) {
            return Err(format!("会话超时时间必须在1到{MAX_DURATION_MINUTES}分钟之间"));
        }
        if self.default_password.chars().count() < 6 {
            return Err("默认密码至少6个字符".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid_and_partial_json_fills_defaults() {
        assert!(Settings::default().validate().is_ok());

        let settings: Settings = serde_json::from_str(r#"{"lockout_minutes": 5}"#).unwrap();
        assert_eq!(settings.lockout_duration(), Some(Duration::minutes(5)));
        assert_eq!(settings.max_login_attempts, 5);
    }

    #[test]
    fn rejects_zero_attempts_and_short_default_password() {
        let zero = Settings {
            max_login_attempts: 0,
            ..Settings::default()
        };
        assert!(zero.validate().is_err());

        let short = Settings {
            default_password: "12345".into(),
            ..Settings::default()
        };
        assert!(short.validate().is_err());
    }

    #[test]
    fn rejects_durations_beyond_one_year() {
        for minutes in [MAX_DURATION_MINUTES + 1, 1_000_000_000_000, i64::MAX] {
            let lockout = Settings {
                lockout_minutes: minutes,
                ..Settings::default()
            };
            assert!(lockout.validate().is_err());

            let session = Settings {
                session_timeout_minutes: minutes,
                ..Settings::default()
            };
            assert!(session.validate().is_err());
        }

        let max = Settings {
            lockout_minutes: MAX_DURATION_MINUTES,
            session_timeout_minutes: MAX_DURATION_MINUTES,
            ..Settings::default()
        };
        assert!(max.validate().is_ok());
    }

    #[test]
    fn out_of_range_minutes_yield_no_duration() {
        let settings = Settings {
            lockout_minutes: i64::MAX,
            session_timeout_minutes: i64::MIN,
            ..Settings::default()
        };
        assert!(settings.lockout_duration().is_none());
        assert!(settings.session_timeout().is_none());
    }
}
