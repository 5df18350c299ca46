//! 会话模型

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 一条活跃会话：令牌绑定到用户和创建时间
///
/// 会话通过 `user_id` 非拥有地引用用户；同一用户可以同时
/// 持有多个会话。
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// 不透明令牌，唯一查找键
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}
