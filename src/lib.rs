//! 多用户观影服务的认证与会话核心
//! 账户注册、凭据验证、不透明令牌签发与会话解析

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;
