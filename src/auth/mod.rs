//! 认证模块：密码哈希、会话令牌与认证中间件

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::{auth_middleware, extract_token, optional_auth_middleware, AuthContext};
pub use password::PasswordHasher;
pub use token::generate_session_token;
