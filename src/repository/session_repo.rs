//! Session repository (数据库访问层)

use crate::{
    error::AppError,
    models::{session::Session, user::User},
};
use sqlx::{PgPool, Row};

pub struct SessionRepository {
    db: PgPool,
}

impl SessionRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 创建会话
    ///
    /// 必须恰好影响一行；令牌主键冲突（概率可忽略）按存储层
    /// 不一致处理，绝不覆盖既有会话。
    pub async fn create(&self, session: &Session) -> Result<(), AppError> {
        let result = sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at) VALUES ($1, $2, $3)",
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(session.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    tracing::error!(user_id = %session.user_id, "Session token collision");
                    return AppError::Internal;
                }
            }
            AppError::Database(e)
        })?;

        if result.rows_affected() != 1 {
            tracing::error!(
                rows = result.rows_affected(),
                "Session insert affected an unexpected row count"
            );
            return Err(AppError::Internal);
        }

        Ok(())
    }

    /// 解析会话：按令牌联表取回 (User, Session)
    ///
    /// 精确匹配走主键索引，一次逻辑查询完成，不做全表扫描比较。
    pub async fn resolve(&self, token: &str) -> Result<Option<(User, Session)>, AppError> {
        let row = sqlx::query(
            r#"
            SELECT
                u.id, u.username, u.email, u.password_hash, u.verified,
                u.created_at AS user_created_at,
                s.token, s.user_id, s.created_at AS session_created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|row| {
            let user = User {
                id: row.get("id"),
                username: row.get("username"),
                email: row.get("email"),
                password_hash: row.get("password_hash"),
                verified: row.get("verified"),
                created_at: row.get("user_created_at"),
            };
            let session = Session {
                token: row.get("token"),
                user_id: row.get("user_id"),
                created_at: row.get("session_created_at"),
            };
            (user, session)
        }))
    }

    /// 删除会话，返回受影响的行数
    ///
    /// 删除不存在的令牌返回 0 而不是错误。
    pub async fn delete(&self, token: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }
}
