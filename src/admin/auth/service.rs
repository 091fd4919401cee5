//! 认证服务层
//!
//! 登录 / 注册表单状态，以及启动时的会话校验

use crate::admin::auth::api::AuthApi;
use crate::admin::auth::types::{hash_password, LoginRequest, SignupRequest};
use crate::admin::client::AdminClient;
use crate::admin::error::{AdminError, AdminResult};
use crate::admin::listener::Route;
use crate::admin::session::TokenKind;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, warn};

pub const LOGIN_FAILED_MESSAGE: &str = "로그인 실패. 사용자 이름이나 비밀번호를 확인하세요.";
pub const SIGNUP_FAILED_MESSAGE: &str = "회원가입 실패. 이미 존재하는 사용자 이름일 수 있습니다.";

/// 认证页当前标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthTab {
    Login,
    Signup,
}

struct FormState {
    active_tab: AuthTab,
    error: Option<String>,
}

/// 认证服务
pub struct AuthService {
    api: AuthApi,
    client: Arc<AdminClient>,
    form: Mutex<FormState>,
}

impl AuthService {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self {
            api: AuthApi::new(client.clone()),
            client,
            form: Mutex::new(FormState {
                active_tab: AuthTab::Login,
                error: None,
            }),
        }
    }

    pub fn active_tab(&self) -> AuthTab {
        self.form.lock().active_tab
    }

    pub fn set_tab(&self, tab: AuthTab) {
        self.form.lock().active_tab = tab;
    }

    /// 表单上显示的错误信息
    pub fn error_message(&self) -> Option<String> {
        self.form.lock().error.clone()
    }

    /// 登录
    ///
    /// 返回 `true` 表示已保存 token 并跳转首页；响应头缺少 token 时什么都不做并返回 `false`
    pub async fn login(&self, account: &str, password: &str) -> AdminResult<bool> {
        self.form.lock().error = None;
        if let Err(e) = require_filled(&[("아이디", account), ("비밀번호", password)]) {
            self.client.report("管理员登录", &e).await;
            return Err(e);
        }

        let request = LoginRequest {
            account: account.to_string(),
            password: hash_password(password),
        };

        match self.api.sign_in(&request).await {
            Ok(Some(session)) => {
                self.client.start_session(&session).await?;
                self.client.navigate(Route::Main).await;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                error!("[AuthService] 登录失败: {}", e);
                self.form.lock().error = Some(LOGIN_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// 注册，成功后切回登录标签
    pub async fn signup(&self, account: &str, password: &str, invite_code: &str) -> AdminResult<()> {
        self.form.lock().error = None;
        if let Err(e) = require_filled(&[
            ("아이디", account),
            ("비밀번호", password),
            ("초대 코드", invite_code),
        ]) {
            self.client.report("管理员注册", &e).await;
            return Err(e);
        }

        let request = SignupRequest {
            account: account.to_string(),
            password: hash_password(password),
            invite_code: invite_code.to_string(),
        };

        match self.api.sign_up(&request).await {
            Ok(()) => {
                self.form.lock().active_tab = AuthTab::Login;
                Ok(())
            }
            Err(e) => {
                error!("[AuthService] 注册失败: {}", e);
                self.form.lock().error = Some(SIGNUP_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// 启动时校验会话，返回并跳转到目标路由
    pub async fn check_session(&self) -> Route {
        let route = if self.client.session().get(TokenKind::Access).await.is_none() {
            info!("[AuthService] 未找到 access token，跳转登录页");
            Route::Login
        } else {
            match self.api.validate_token().await {
                Ok(()) => {
                    info!("[AuthService] ✅ 会话有效");
                    Route::Main
                }
                Err(AdminError::Unauthorized) => {
                    // 请求层已清空会话并跳转
                    return Route::Login;
                }
                Err(e) => {
                    warn!("[AuthService] 会话校验失败，清空 token: {}", e);
                    if let Err(clear_err) = self.client.session().clear_all().await {
                        error!("[AuthService] 清空会话失败: {:?}", clear_err);
                    }
                    Route::Login
                }
            }
        };
        self.client.navigate(route).await;
        route
    }

    pub async fn logout(&self) -> AdminResult<()> {
        self.client.end_session().await
    }
}

fn require_filled(fields: &[(&str, &str)]) -> AdminResult<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AdminError::validation(format!(
            "必填项为空: {}",
            missing.join(", ")
        )))
    }
}
