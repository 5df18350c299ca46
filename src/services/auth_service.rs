//! 认证服务：注册、登录、登出、会话解析
//!
//! 服务本身无状态，所有持久状态都在 users/sessions 表里，
//! 并发竞争由数据库的唯一约束裁决。

use crate::{
    auth::password::PasswordHasher,
    auth::token::generate_session_token,
    error::{AppError, MSG_BAD_CREDENTIALS, MSG_NOT_AUTHENTICATED},
    models::{session::Session, user::User},
    repository::{
        session_repo::SessionRepository,
        user_repo::{UserRepository, MSG_EMAIL_TAKEN, MSG_USERNAME_TAKEN},
    },
};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::PgPool;

/// 用户名：4-16 个字母、数字或下划线
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[A-Za-z0-9_]{4,16}$").expect("invalid username regex"));

/// 邮箱：非空白@非空白.非空白
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("invalid email regex"));

/// "system" 保留给聊天里的合成身份，永不可注册
const RESERVED_USERNAME: &str = "system";

pub struct AuthService {
    db: PgPool,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(db: PgPool) -> Self {
        Self {
            db,
            hasher: PasswordHasher::new(),
        }
    }

    /// 注册新账户
    ///
    /// 校验按固定顺序短路，保证客户端拿到确定的错误消息；
    /// 唯一性先查邮箱后查用户名（两者都被占用时始终报邮箱冲突），
    /// 真正的裁决是 INSERT 上的唯一约束。注册不会让账户登录。
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<(), AppError> {
        validate_registration(username, password, email)?;

        let user_repo = UserRepository::new(self.db.clone());

        if user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(MSG_EMAIL_TAKEN.to_string()));
        }
        if user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(MSG_USERNAME_TAKEN.to_string()));
        }

        let password_hash = self.hasher.hash(password)?;
        let user = user_repo.create(username, email, &password_hash).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            "New account registered"
        );

        Ok(())
    }

    /// 登录：颁发新的会话令牌
    ///
    /// 账户不存在与密码错误返回完全相同的 401 消息；
    /// 验证标记在密码之前检查，与密码正确与否无关。
    /// 密码必须验证通过才会颁发令牌。
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &str,
    ) -> Result<(User, Session), AppError> {
        if username_or_email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "No username or password provided!".to_string(),
            ));
        }

        let user_repo = UserRepository::new(self.db.clone());

        let user = user_repo
            .find_by_username_or_email(username_or_email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(MSG_BAD_CREDENTIALS.to_string()))?;

        if !user.verified {
            return Err(AppError::Forbidden(
                "Your account is not verified yet!".to_string(),
            ));
        }

        if !self.hasher.verify(password, &user.password_hash)? {
            tracing::warn!(username = %user.username, "Failed login attempt");
            return Err(AppError::Unauthorized(MSG_BAD_CREDENTIALS.to_string()));
        }

        let session = Session {
            token: generate_session_token(),
            user_id: user.id,
            created_at: Utc::now(),
        };
        SessionRepository::new(self.db.clone()).create(&session).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

        Ok((user, session))
    }

    /// 登出：按令牌删除会话
    ///
    /// 零行受影响说明会话已经不存在，对外表现与从未登录一致。
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let deleted = SessionRepository::new(self.db.clone()).delete(token).await?;

        if deleted == 0 {
            return Err(AppError::Unauthorized(MSG_NOT_AUTHENTICATED.to_string()));
        }

        tracing::debug!("Session deleted (logout)");
        Ok(())
    }

    /// 把请求携带的令牌解析为 (User, Session)
    ///
    /// 未找到与存储层故障折叠为同一个 401，不向客户端
    /// 泄露内部状态。
    pub async fn authenticate(&self, token: &str) -> Result<(User, Session), AppError> {
        if token.is_empty() {
            return Err(AppError::unauthenticated());
        }

        match SessionRepository::new(self.db.clone()).resolve(token).await {
            Ok(Some(pair)) => Ok(pair),
            Ok(None) => Err(AppError::unauthenticated()),
            Err(e) => {
                tracing::error!(error = %e, "Session lookup failed");
                Err(AppError::unauthenticated())
            }
        }
    }
}

/// 注册入参校验，按顺序短路
pub fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
) -> Result<(), AppError> {
    if username.is_empty() || password.is_empty() || email.is_empty() {
        return Err(AppError::Validation(
            "No username, e-mail or password provided!".to_string(),
        ));
    }
    if username == RESERVED_USERNAME {
        return Err(AppError::Conflict(MSG_USERNAME_TAKEN.to_string()));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::Validation(
            "Username should be 4-16 characters long, and contain alphanumeric characters or _ only!"
                .to_string(),
        ));
    }
    let password_chars = password.chars().count();
    if !(8..=64).contains(&password_chars) {
        return Err(AppError::Validation(
            "Your password must be between 8 and 64 characters long!".to_string(),
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::Validation("Invalid e-mail entered!".to_string()));
    }
    Ok(())
}
