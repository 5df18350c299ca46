//! User repository (数据库访问层)

use crate::{error::AppError, models::user::User};
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// 邮箱占用提示
pub const MSG_EMAIL_TAKEN: &str = "An account with this e-mail already exists!";
/// 用户名占用提示
pub const MSG_USERNAME_TAKEN: &str = "An account with this username already exists!";

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建用户
    ///
    /// 单条 INSERT，id 由调用方以外的本层生成；唯一约束冲突
    /// 由数据库裁决并映射为 409，应用层的预检查只用于给出
    /// 确定的错误顺序。
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, verified, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(map_unique_violation)?;

        Ok(user)
    }

    /// 根据用户名查找用户（区分大小写的精确匹配）
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据用户名或邮箱查找用户（登录用，单条查询匹配两列）
    pub async fn find_by_username_or_email(&self, value: &str) -> Result<Option<User>, AppError> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1 OR email = $1")
                .bind(value)
                .fetch_optional(&self.db)
                .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 批量查询用户名（usernames 端点用）
    pub async fn find_usernames_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<(Uuid, String)>, AppError> {
        let rows = sqlx::query("SELECT id, username FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("id"), row.get("username")))
            .collect())
    }

    /// 更新验证标记
    ///
    /// 邮箱验证流程在本核心之外，这里只提供管理入口。
    pub async fn set_verified(&self, id: Uuid, verified: bool) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE users SET verified = $2 WHERE id = $1")
            .bind(id)
            .bind(verified)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// 将唯一约束冲突映射为字段相关的 409
fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_email_key") => AppError::Conflict(MSG_EMAIL_TAKEN.to_string()),
                Some("users_username_key") => AppError::Conflict(MSG_USERNAME_TAKEN.to_string()),
                _ => AppError::Conflict(MSG_USERNAME_TAKEN.to_string()),
            };
        }
    }
    AppError::Database(e)
}
