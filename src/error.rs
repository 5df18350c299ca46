//! 统一错误模型
//! 定义所有错误类型和客户端可见的错误响应格式

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 未认证时的统一提示
///
/// 无令牌、无效令牌、已删除令牌三种情况必须返回同一条消息，
/// 不向客户端暴露内部区别。
pub const MSG_NOT_AUTHENTICATED: &str = "You are not authenticated to access this resource!";

/// 登录失败的统一提示
///
/// 账户不存在与密码错误必须逐字节相同，防止账户枚举。
pub const MSG_BAD_CREDENTIALS: &str = "No account with this username/email exists!";

/// 内部错误的客户端提示（不泄露细节）
pub const MSG_INTERNAL: &str = "Internal Server Error!";

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// 未认证错误（统一消息）
    pub fn unauthenticated() -> Self {
        AppError::Unauthorized(MSG_NOT_AUTHENTICATED.to_string())
    }

    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Config(_) | AppError::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 获取用户可见的错误消息（不包含敏感信息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::NotFound => "Resource not found".to_string(),
            AppError::Database(_) | AppError::Config(_) | AppError::Internal => {
                MSG_INTERNAL.to_string()
            }
        }
    }

    /// 获取错误码
    pub fn code(&self) -> u16 {
        self.status_code().as_u16()
    }
}

/// 错误响应 DTO
///
/// 所有错误响应体均为 `{"error": "<message>"}`。
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 基础设施错误只进日志，客户端只看到通用消息
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "Internal error");
        } else {
            tracing::debug!(code = self.code(), error = %self, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

/// 从 String 转换为 AppError::Config
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::Config(s)
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AppError {
    fn from(e: config::ConfigError) -> Self {
        AppError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::unauthenticated().code(), 401);
        assert_eq!(AppError::Forbidden("nope".to_string()).code(), 403);
        assert_eq!(AppError::NotFound.code(), 404);
        assert_eq!(AppError::Validation("bad".to_string()).code(), 400);
        assert_eq!(AppError::Conflict("taken".to_string()).code(), 409);
        assert_eq!(AppError::Internal.code(), 500);
    }

    #[test]
    fn test_user_message_no_sensitive_info() {
        let error = AppError::Database(sqlx::Error::RowNotFound);
        let message = error.user_message();
        assert_eq!(message, MSG_INTERNAL);
        assert!(!message.contains("sqlx"));
    }

    #[test]
    fn test_unauthenticated_message_is_stable() {
        assert_eq!(
            AppError::unauthenticated().user_message(),
            "You are not authenticated to access this resource!"
        );
    }
}
