use axum::{
    extract::{Extension, Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    error::AppError,
    models::{LogAction, MAX_LOG_ENTRIES, Settings},
    utils::{Claims, success_to_api_response},
};

use super::model::{CreateBackupRequest, LogQuery, PingResponse};

const DEFAULT_LOG_LIMIT: usize = 50;

/// 健康检查接口
pub async fn ping() -> impl IntoResponse {
    (
        StatusCode::OK,
        success_to_api_response(PingResponse {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        }),
    )
}

/// 最新的操作日志在前
#[axum::debug_handler]
pub async fn list_logs(
    State(state): State<AppState>,
    Query(query): Query<LogQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT).clamp(1, MAX_LOG_ENTRIES);
    let logs = state.store.read(|db| db.recent_logs(limit)).await;
    (StatusCode::OK, success_to_api_response(logs))
}

pub async fn list_backups(State(state): State<AppState>) -> impl IntoResponse {
    let backups = state.store.list_backups().await;
    (StatusCode::OK, success_to_api_response(backups))
}

#[axum::debug_handler]
pub async fn create_backup(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<CreateBackupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.store.create_backup(&claims.username, &req.note).await?;
    Ok((StatusCode::CREATED, success_to_api_response(summary)))
}

#[axum::debug_handler]
pub async fn restore_backup(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(backup_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .store
        .restore_backup(&backup_id, &claims.username)
        .await?;
    Ok((StatusCode::OK, success_to_api_response(())))
}

pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.store.read(|db| db.settings.clone()).await;
    (StatusCode::OK, success_to_api_response(settings))
}

#[axum::debug_handler]
pub async fn update_settings(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<impl IntoResponse, AppError> {
    settings.validate().map_err(AppError::Validation)?;

    let saved = state
        .store
        .update(|db| {
            db.settings = settings;
            db.append_log(&claims.username, LogAction::SettingsUpdated, "更新系统设置");
            db.settings.clone()
        })
        .await?;

    tracing::info!("Settings updated by {}", claims.username);
    Ok((StatusCode::OK, success_to_api_response(saved)))
}
