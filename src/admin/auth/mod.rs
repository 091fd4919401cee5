//! 认证模块
//!
//! 登录、注册、启动时的会话校验与登出

pub mod api;
pub mod service;
pub mod types;

pub use api::AuthApi;
pub use service::{AuthService, AuthTab};
pub use types::{hash_password, LoginRequest, SignupRequest};
