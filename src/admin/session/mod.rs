//! 会话模块
//!
//! 保存 access / refresh 两个 token，请求层每次调用都从这里读取

pub mod dao;
pub mod models;
pub mod store;

pub use dao::SqliteSessionStore;
pub use models::{Session, TokenKind};
pub use store::{MemorySessionStore, SessionStore};
