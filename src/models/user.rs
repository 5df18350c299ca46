//! 用户模型

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 用户账户（数据库记录）
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id PHC 字符串，绝不向外序列化
    pub password_hash: String,
    /// 未验证的账户可以注册但不能登录
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// 用户响应 DTO（不含密码哈希）
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}
