//! 认证相关的 HTTP 处理器
//!
//! 令牌通过 `token` Cookie 或 `Authentication` 头携带，
//! Cookie 优先。所有错误响应体为 `{"error": "<message>"}`。

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    middleware::AppState,
    models::auth::{LoginRequest, LoginResponse, RegisterRequest, StatusResponse},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// 状态端点（GET /）
///
/// 对未登录用户也返回 200，只是 `authenticated` 为 false。
pub async fn status(auth: Option<AuthContext>) -> Json<StatusResponse> {
    Json(StatusResponse {
        online: true,
        authenticated: auth.is_some(),
        username: auth.map(|ctx| ctx.user.username),
    })
}

/// 登录
///
/// 成功时令牌同时写入响应体和持久 Cookie（HttpOnly、
/// SameSite=Strict、31 天），非浏览器客户端可改用头部认证。
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body.map_err(|_| AppError::Validation("Unable to read body!".to_string()))?;

    let (user, session) = state.auth_service.login(&req.username, &req.password).await?;

    let cookie = session_cookie(
        &session.token,
        state.config.session_cookie_max_age_secs(),
        state.config.security.secure_cookies,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token: session.token,
            username: user.username,
        }),
    ))
}

/// 登出
///
/// 会话已被解析过（路由带认证中间件）；删除时零行受影响
/// 仍按未认证处理。成功后让浏览器丢弃 Cookie。
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    state.auth_service.logout(&auth.session.token).await?;

    let cookie = session_cookie("null", -1, state.config.security.secure_cookies);

    Ok(([(header::SET_COOKIE, cookie)], Json(json!({"success": true}))))
}

/// 注册
///
/// 注册与登录相互独立，成功后不会自动建立会话。
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = body.map_err(|_| AppError::Validation("Unable to read body!".to_string()))?;

    state
        .auth_service
        .register(&req.username, &req.password, &req.email)
        .await?;

    Ok(Json(json!({"success": true})))
}

/// 渲染会话 Cookie
///
/// 登出时以 `Max-Age=-1` 加哨兵值覆盖，令浏览器立即删除。
fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("token={token}; Max-Age={max_age_secs}; Path=/; HttpOnly; SameSite=Strict");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc123", 31 * 24 * 3600, false);
        assert_eq!(
            cookie,
            "token=abc123; Max-Age=2678400; Path=/; HttpOnly; SameSite=Strict"
        );
    }

    #[test]
    fn test_session_cookie_secure_flag() {
        let cookie = session_cookie("abc123", 3600, true);
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_logout_cookie_expires_immediately() {
        let cookie = session_cookie("null", -1, false);
        assert!(cookie.starts_with("token=null; Max-Age=-1;"));
    }
}
