use axum::Json;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::models::{Role, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // 用户ID
    pub username: String, // 用户名
    pub role: Role,       // 角色
    pub exp: i64,         // 过期时间
    pub iat: i64,         // 签发时间
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("session lifetime is out of range")]
    LifetimeOutOfRange,
    #[error(transparent)]
    Encode(#[from] jsonwebtoken::errors::Error),
}

/// 签发会话令牌，有效期取自系统设置
pub fn generate_token(
    user: &User,
    ttl: Duration,
    config: &Config,
) -> Result<(String, DateTime<Utc>), TokenError> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or(TokenError::LifetimeOutOfRange)?;

    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    tracing::debug!("Issued token for {} until {}", user.username, expires_at);
    Ok((token, expires_at))
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// 统一响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 错误码，0表示成功
    pub code: i32,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resp_data: Option<T>,
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code: error_codes::SUCCESS,
        msg: "success".into(),
        resp_data: Some(data),
    })
}

pub fn error_to_api_response<T>(code: i32, msg: String) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        code,
        msg,
        resp_data: None,
    })
}

pub mod error_codes {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION_ERROR: i32 = 1000;
    pub const USER_EXISTS: i32 = 1001;
    pub const AUTH_FAILED: i32 = 1002;
    pub const PERMISSION_DENIED: i32 = 1003;
    pub const NOT_FOUND: i32 = 1004;
    pub const ACCOUNT_LOCKED: i32 = 1006;
    pub const ACCOUNT_DISABLED: i32 = 1007;
    pub const IMPORT_FAILED: i32 = 1008;
    pub const INTERNAL_ERROR: i32 = 5000;
}
