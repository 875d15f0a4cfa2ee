use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};
use tower::ServiceBuilder;

use crate::{
    AppState,
    middleware::{auth_middleware, log_errors, require_admin},
    routes,
};

// 无需登录的路由
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(routes::system::ping))
        .route("/auth/login", post(routes::auth::login))
}

// 仅管理员可访问的路由
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(routes::user::create_user))
        .route("/users/{id}", delete(routes::user::delete_user))
        .route(
            "/users/{id}/reset-password",
            post(routes::user::reset_password),
        )
        .route("/users/{id}/unlock", post(routes::user::unlock_user))
        .route("/users/{id}/status", post(routes::user::update_status))
        .route("/users/import", post(routes::user::import_users))
        .route("/users/import/template", get(routes::user::import_template))
        .route("/system/logs", get(routes::system::list_logs))
        .route(
            "/system/backups",
            get(routes::system::list_backups).post(routes::system::create_backup),
        )
        .route(
            "/system/backups/{id}/restore",
            post(routes::system::restore_backup),
        )
        .route(
            "/system/settings",
            get(routes::system::get_settings).put(routes::system::update_settings),
        )
        .route_layer(from_fn(require_admin))
}

/// 创建主路由，API 挂在配置的前缀下
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/users/me", get(routes::user::me))
        .merge(admin_routes())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let api = public_routes().merge(protected_routes);
    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = if base.is_empty() {
        api
    } else {
        Router::new().nest(base, api)
    };

    router
        .layer(ServiceBuilder::new().layer(from_fn(log_errors)))
        .with_state(state)
}
