use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{
    AppState,
    error::AppError,
    models::Role,
    utils::{Claims, verify_token},
};

/// 校验 Bearer 令牌，并确认令牌对应的账号仍然存在且可用
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;

    let claims = verify_token(bearer.token(), &state.config).map_err(|e| {
        tracing::debug!("Rejected token: {}", e);
        AppError::Unauthorized
    })?;

    let usable = state
        .store
        .read(|db| db.find_user(&claims.sub).is_some_and(|u| u.active))
        .await;
    if !usable {
        tracing::info!("Token for missing or disabled user {}", claims.username);
        return Err(AppError::Unauthorized);
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// 必须放在 auth_middleware 之后
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    match req.extensions().get::<Claims>() {
        Some(claims) if claims.role == Role::Admin => Ok(next.run(req).await),
        Some(claims) => {
            tracing::warn!("User {} ({}) tried an admin route", claims.username, claims.role);
            Err(AppError::Forbidden)
        }
        None => Err(AppError::Unauthorized),
    }
}
