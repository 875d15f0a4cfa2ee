use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::auth::{AuthError, CredentialError};
use crate::import::ImportError;
use crate::store::StoreError;
use crate::utils::{TokenError, error_codes, error_to_api_response};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("permission denied")]
    Forbidden,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Validation(String),
    #[error("failed to issue token: {0}")]
    Token(#[from] TokenError),
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED),
            AppError::Forbidden => (StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED),
            AppError::Auth(AuthError::Locked { .. }) => {
                (StatusCode::FORBIDDEN, error_codes::ACCOUNT_LOCKED)
            }
            AppError::Auth(AuthError::Inactive) => {
                (StatusCode::FORBIDDEN, error_codes::ACCOUNT_DISABLED)
            }
            AppError::Auth(AuthError::LockoutOutOfRange { .. }) | AppError::InvalidSettings(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
            AppError::Auth(_) => (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED),
            AppError::Credential(CredentialError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, error_codes::NOT_FOUND)
            }
            AppError::Credential(CredentialError::Duplicate { .. }) => {
                (StatusCode::CONFLICT, error_codes::USER_EXISTS)
            }
            AppError::Credential(CredentialError::Validation(_)) | AppError::Validation(_) => {
                (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR)
            }
            AppError::Import(_) => (StatusCode::BAD_REQUEST, error_codes::IMPORT_FAILED),
            AppError::Store(StoreError::BackupNotFound(_)) => {
                (StatusCode::NOT_FOUND, error_codes::NOT_FOUND)
            }
            AppError::Store(_) | AppError::Token(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }

    /// 面向用户的提示信息
    fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "未授权访问".into(),
            AppError::Forbidden => "没有权限执行此操作".into(),
            // 不区分用户不存在和密码错误
            AppError::Auth(AuthError::UserNotFound) => "用户名或密码错误".into(),
            AppError::Auth(AuthError::InvalidPassword { remaining_attempts }) => {
                format!("用户名或密码错误，还可尝试{remaining_attempts}次")
            }
            AppError::Auth(AuthError::Inactive) => "账号已被禁用".into(),
            AppError::Auth(AuthError::Locked { until }) => {
                format!("账号已锁定，请于{}后重试", until.format("%Y-%m-%d %H:%M:%S"))
            }
            AppError::Auth(AuthError::LockoutOutOfRange { .. }) | AppError::InvalidSettings(_) => {
                "系统设置无效，请联系管理员".into()
            }
            AppError::Credential(CredentialError::NotFound(_)) => "用户不存在".into(),
            AppError::Credential(CredentialError::Duplicate { username, role }) => {
                format!("{}已存在: {}", role.label(), username)
            }
            AppError::Credential(CredentialError::Validation(msg)) | AppError::Validation(msg) => {
                msg.clone()
            }
            AppError::Import(e) => format!("导入失败: {e}"),
            AppError::Store(StoreError::BackupNotFound(_)) => "备份不存在".into(),
            AppError::Store(_) => "保存数据失败".into(),
            AppError::Token(_) => "生成令牌失败".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, error_to_api_response::<()>(code, self.user_message())).into_response()
    }
}
