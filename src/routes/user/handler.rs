use axum::{
    extract::{Extension, Json, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;

use crate::{
    AppState,
    auth::credentials,
    error::AppError,
    import,
    models::{NewUser, Role},
    utils::{Claims, success_to_api_response},
};

use super::model::{
    CourseSummary, MeResponse, ResetPasswordRequest, UpdateStatusRequest, UserProfile,
};

/// 当前用户信息及其相关课程，学生看到选修课程和成绩，教师看到讲授课程
#[axum::debug_handler]
pub async fn me(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let response = state
        .store
        .read(|db| {
            let user = db.find_user(&claims.sub)?;
            let courses: Vec<CourseSummary> = match user.role {
                Role::Student => db
                    .courses_enrolled(&user.id)
                    .into_iter()
                    .map(|c| CourseSummary::new(c, db, Some(&user.id)))
                    .collect(),
                Role::Teacher => db
                    .courses_taught(&user.id)
                    .into_iter()
                    .map(|c| CourseSummary::new(c, db, None))
                    .collect(),
                Role::Admin => Vec::new(),
            };
            Some(MeResponse {
                user: UserProfile::from(user),
                courses,
            })
        })
        .await
        .ok_or(AppError::Unauthorized)?;

    Ok((StatusCode::OK, success_to_api_response(response)))
}

#[axum::debug_handler]
pub async fn create_user(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Json(req): Json<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .store
        .update(|db| credentials::create_user(db, req, &claims.username, Utc::now()))
        .await??;

    Ok((
        StatusCode::CREATED,
        success_to_api_response(UserProfile::from(&user)),
    ))
}

#[axum::debug_handler]
pub async fn delete_user(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state
        .store
        .update(|db| credentials::delete_user(db, &user_id, &claims.sub, &claims.username))
        .await??;

    Ok((StatusCode::OK, success_to_api_response(summary)))
}

#[axum::debug_handler]
pub async fn reset_password(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .store
        .update(|db| {
            credentials::reset_password(db, &user_id, req.password.as_deref(), &claims.username)
        })
        .await??;

    Ok((StatusCode::OK, success_to_api_response(())))
}

#[axum::debug_handler]
pub async fn unlock_user(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state
        .store
        .update(|db| credentials::unlock(db, &user_id, &claims.username))
        .await??;

    Ok((StatusCode::OK, success_to_api_response(())))
}

#[axum::debug_handler]
pub async fn update_status(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .store
        .update(|db| {
            credentials::set_active(db, &user_id, req.active, &claims.sub, &claims.username)
        })
        .await??;

    Ok((StatusCode::OK, success_to_api_response(())))
}

/// 请求体为 CSV 文本
#[axum::debug_handler]
pub async fn import_users(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, AppError> {
    let report = state
        .store
        .update(|db| import::import_users(db, &body, &claims.username, Utc::now()))
        .await??;

    Ok((StatusCode::OK, success_to_api_response(report)))
}

pub async fn import_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"user_import_template.csv\"",
            ),
        ],
        import::template(),
    )
}
