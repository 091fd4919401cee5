//! 认证 HTTP API 客户端

use crate::admin::auth::types::{LoginRequest, SignupRequest};
use crate::admin::client::{AdminClient, RequestOptions};
use crate::admin::error::AdminResult;
use crate::admin::session::Session;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::{info, warn};

const SIGN_IN_PATH: &str = "/api/v1/sign-in/admin";
const SIGN_UP_PATH: &str = "/api/v1/sign-up/admin";
const CURRENT_MEMBER_PATH: &str = "/api/v1/member/id";

/// 认证相关的 HTTP API 客户端
pub struct AuthApi {
    client: Arc<AdminClient>,
}

impl AuthApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    /// 管理员登录
    ///
    /// token 在响应头 `Authorization` / `Refresh-Token` 中返回，缺任意一个都返回 `None`
    pub async fn sign_in(&self, request: &LoginRequest) -> AdminResult<Option<Session>> {
        let options = RequestOptions::put().json(request)?.anonymous();
        let response = self.client.request("管理员登录", SIGN_IN_PATH, options).await?;
        let session = session_from_headers(response.headers());
        if session.is_none() {
            warn!("[AuthAPI] 登录响应缺少 token 响应头");
        } else {
            info!("[AuthAPI] ✅ 登录成功，账号: {}", request.account);
        }
        Ok(session)
    }

    /// 使用邀请码注册管理员
    pub async fn sign_up(&self, request: &SignupRequest) -> AdminResult<()> {
        let options = RequestOptions::post().json(request)?.anonymous();
        self.client.execute("管理员注册", SIGN_UP_PATH, options).await?;
        info!("[AuthAPI] ✅ 注册成功，账号: {}", request.account);
        Ok(())
    }

    /// 校验当前 token（携带已保存的 access token）
    pub async fn validate_token(&self) -> AdminResult<()> {
        self.client
            .execute("校验会话", CURRENT_MEMBER_PATH, RequestOptions::get())
            .await
    }
}

/// 从响应头提取两个 token
pub(crate) fn session_from_headers(headers: &HeaderMap) -> Option<Session> {
    let read = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    let access = read("authorization")?;
    let refresh = read("refresh-token")?;
    Some(Session::new(access, refresh))
}
