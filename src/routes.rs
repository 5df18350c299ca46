//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{auth, handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 状态端点：认证是可选的
    let status_routes = Router::new()
        .route("/", get(handlers::auth::status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::optional_auth_middleware,
        ));

    // 认证路由（无需已有会话）
    let auth_routes = Router::new()
        .route("/api/login", post(handlers::auth::login))
        .route("/api/register", post(handlers::auth::register));

    // 需要有效会话的路由
    let session_routes = Router::new()
        .route("/api/logout", post(handlers::auth::logout))
        .route("/api/usernames", get(handlers::user::get_usernames))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(status_routes)
        .merge(auth_routes)
        .merge(session_routes)
        .layer(middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}
