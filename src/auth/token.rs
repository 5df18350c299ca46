//! 会话令牌生成
//!
//! 令牌是不透明的随机字符串，只作为会话表的查找键使用。

use rand::{rngs::OsRng, RngCore};

/// 令牌的原始随机字节数（十六进制编码后为 128 个字符）
pub const SESSION_TOKEN_BYTES: usize = 64;

/// 生成一个新的会话令牌
///
/// 64 字节来自操作系统的 CSPRNG，碰撞概率可以忽略；
/// 即便如此，sessions 表的主键仍会拒绝重复插入而不是覆盖。
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        let token = generate_session_token();
        assert_eq!(token.len(), SESSION_TOKEN_BYTES * 2);
    }

    #[test]
    fn test_token_is_lowercase_hex() {
        let token = generate_session_token();
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = generate_session_token();
        let b = generate_session_token();
        assert_ne!(a, b);
    }
}
