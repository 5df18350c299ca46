//! 会话认证中间件
//!
//! 从请求中提取不透明令牌并解析为 (User, Session)，
//! 这是其他子系统依赖的唯一认证能力。

use crate::{error::AppError, middleware::AppState, models::session::Session, models::user::User};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

/// 认证上下文（附加到请求扩展）
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: User,
    pub session: Session,
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(AppError::unauthenticated)
    }
}

// 可选提取：状态端点对未登录用户也要响应
impl<S> OptionalFromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthContext>().cloned())
    }
}

/// 从请求中提取会话令牌
///
/// `token` Cookie 优先于 `Authentication` 头：两者同时存在时
/// 以 Cookie 为准。空令牌视同缺失。
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let cookie_token = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(str::trim)
                .find_map(|c| c.strip_prefix("token="))
                .map(str::to_string)
        });

    cookie_token
        .or_else(|| {
            headers
                .get("authentication")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .filter(|t| !t.is_empty())
}

/// 会话认证中间件 - 必须认证
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(req.headers()).ok_or_else(AppError::unauthenticated)?;

    let (user, session) = state.auth_service.authenticate(&token).await?;

    req.extensions_mut().insert(AuthContext { user, session });

    Ok(next.run(req).await)
}

/// 可选认证 - 不强制要求令牌
pub async fn optional_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_token(req.headers()) {
        if let Ok((user, session)) = state.auth_service.authenticate(&token).await {
            req.extensions_mut().insert(AuthContext { user, session });
        }
    }

    next.run(req).await
}
