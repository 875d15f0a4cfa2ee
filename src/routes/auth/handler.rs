use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    AppState,
    auth::authenticate,
    error::AppError,
    routes::user::UserProfile,
    utils::{generate_token, success_to_api_response},
};

use super::model::{LoginRequest, LoginResponse};

/// 登录：失败计数和锁定状态无论成败都会写回
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation("用户名和密码不能为空".into()));
    }

    let (result, ttl, timeout_minutes) = state
        .store
        .update(|db| {
            let result = authenticate(db, username, &req.password, req.role, Utc::now());
            (
                result,
                db.settings.session_timeout(),
                db.settings.session_timeout_minutes,
            )
        })
        .await?;
    let user = result?;
    let ttl = ttl.ok_or_else(|| {
        AppError::InvalidSettings(format!(
            "session_timeout_minutes = {timeout_minutes} is out of range"
        ))
    })?;

    let (token, expires_at) = generate_token(&user, ttl, &state.config)?;
    tracing::info!("User {} logged in as {}", user.username, user.role);

    Ok((
        StatusCode::OK,
        success_to_api_response(LoginResponse {
            token,
            expires_at,
            user: UserProfile::from(&user),
        }),
    ))
}
