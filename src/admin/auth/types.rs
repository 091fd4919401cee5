//! 认证 API DTO

use serde::Serialize;
use sha2::{Digest, Sha256};

/// 登录请求（password 为 SHA-256 十六进制摘要）
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub account: String,
    pub password: String,
}

/// 管理员注册请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub account: String,
    pub password: String,
    pub invite_code: String,
}

/// 密码摘要：SHA-256 小写十六进制
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
