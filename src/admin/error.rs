//! 管理端统一错误类型
//!
//! 所有远程调用、参数校验、本地会话存储的失败都收敛到 [`AdminError`]。

use thiserror::Error;

/// 管理端错误
#[derive(Debug, Error)]
pub enum AdminError {
    /// 传输层失败（网络不可达、DNS 失败等），不重试
    #[error("网络错误: {0}")]
    Network(#[source] reqwest::Error),

    /// 服务器返回 401，本地会话已清除
    #[error("未授权访问，会话已失效")]
    Unauthorized,

    /// 其他非 2xx 响应
    #[error("HTTP 错误 {status}: {body}")]
    Api { status: u16, body: String },

    /// 提交前的客户端校验失败（例如缺少挑战图片）
    #[error("参数校验失败: {0}")]
    Validation(String),

    /// 响应体无法解析为约定的信封结构
    #[error("解析响应失败: {0}")]
    Decode(String),

    /// 本地会话存储读写失败
    #[error("本地存储错误: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AdminError {
    /// 便捷构造校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP 状态码（仅 Api / Unauthorized 有意义）
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

pub type AdminResult<T> = std::result::Result<T, AdminError>;
