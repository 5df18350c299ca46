//! 用户查询的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext, error::AppError, middleware::AppState,
    repository::user_repo::UserRepository,
};
use axum::{
    extract::{RawQuery, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

/// 按 ID 批量查询用户名（GET /api/usernames?id=..&id=..）
///
/// 查询串允许重复的 `id` 参数；无法解析的值直接忽略。
pub async fn get_usernames(
    State(state): State<Arc<AppState>>,
    _auth: AuthContext,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, AppError> {
    let ids = parse_id_params(query.as_deref().unwrap_or(""));

    let repo = UserRepository::new(state.db.clone());
    let usernames = repo.find_usernames_by_ids(&ids).await?;

    let mut body = serde_json::Map::new();
    for (id, username) in usernames {
        body.insert(id.to_string(), serde_json::Value::String(username));
    }

    Ok(Json(serde_json::Value::Object(body)))
}

/// 从原始查询串中收集 `id` 参数
fn parse_id_params(query: &str) -> Vec<Uuid> {
    query
        .split('&')
        .filter_map(|pair| pair.strip_prefix("id="))
        .filter_map(|value| Uuid::parse_str(value).ok())
        .collect()
}
