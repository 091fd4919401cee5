//! 管理端回调接口
//!
//! 页面跳转与错误提示都交给调用方实现（CLI、TUI 或 Web 前端）。

use crate::admin::error::AdminError;
use async_trait::async_trait;
use tracing::{debug, error};

/// 后台路由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// 登录页
    Login,
    /// 后台首页
    Main,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/auth",
            Route::Main => "/main",
        }
    }
}

/// 导航监听器：会话失效或登录成功时触发整页跳转
#[async_trait]
pub trait NavigationListener: Send + Sync {
    async fn on_navigate(&self, route: Route);
}

/// 统一的错误提示接口（横幅 / toast）
///
/// 请求层的失败路径和页面的校验失败都会调用它。
#[async_trait]
pub trait ErrorReporter: Send + Sync {
    async fn on_error(&self, operation: &str, error: &AdminError);
}

/// 默认空实现
pub struct EmptyNavigationListener;

#[async_trait]
impl NavigationListener for EmptyNavigationListener {
    async fn on_navigate(&self, route: Route) {
        debug!("[Listener] 忽略导航: {}", route.path());
    }
}

/// 默认实现：只写日志
pub struct LogErrorReporter;

#[async_trait]
impl ErrorReporter for LogErrorReporter {
    async fn on_error(&self, operation: &str, err: &AdminError) {
        error!("[Listener] {}失败: {}", operation, err);
    }
}
