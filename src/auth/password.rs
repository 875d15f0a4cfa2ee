//! 密码哈希
//!
//! 沿用旧数据的滚动哈希：不是真正的密钥派生函数，只为兼容已保存的哈希值。

use crate::models::User;

pub const HASH_ITERATIONS: usize = 1000;

/// 32 位 `h = h * 31 + c`，按 UTF-16 编码单元计算，输出 |h| 的十六进制
fn rolling_hash(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    format!("{:x}", hash.unsigned_abs())
}

pub fn hash_password(password: &str, salt: &str) -> String {
    let mut digest = format!("{password}{salt}");
    for _ in 0..HASH_ITERATIONS {
        digest = rolling_hash(&digest);
    }
    digest
}

/// 密码匹配时所用的盐
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltScheme {
    /// 用户名作盐
    Canonical,
    /// 记录里保存的旧盐
    Legacy,
}

/// 先用用户名作盐比对，失败时再试记录中的旧盐
pub fn verify_password(user: &User, password: &str) -> Option<SaltScheme> {
    if hash_password(password, &user.username) == user.password_hash {
        return Some(SaltScheme::Canonical);
    }

    match user.salt.as_deref() {
        Some(salt) if salt != user.username && hash_password(password, salt) == user.password_hash => {
            Some(SaltScheme::Legacy)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_hash_matches_known_values() {
        assert_eq!(rolling_hash(""), "0");
        // "a" = 97
        assert_eq!(rolling_hash("a"), "61");
        // 97 * 31 + 98 = 3105
        assert_eq!(rolling_hash("ab"), "c21");
    }

    #[test]
    fn rolling_hash_wraps_instead_of_overflowing() {
        let long = "x".repeat(10_000);
        assert!(!rolling_hash(&long).is_empty());
    }

    #[test]
    fn hash_depends_on_salt() {
        let a = hash_password("123456", "alice");
        let b = hash_password("123456", "bob");
        assert_ne!(a, b);
        assert_eq!(a, hash_password("123456", "alice"));
    }
}
