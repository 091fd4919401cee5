//! 会话存储接口

use crate::admin::session::models::{Session, TokenKind};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// 会话存储接口
///
/// `get` 永不失败：读取出错时按"不存在"处理。
/// `set` 返回后立即对后续读取生效。
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, kind: TokenKind) -> Option<String>;

    async fn set(&self, kind: TokenKind, value: &str) -> Result<()>;

    async fn clear(&self, kind: TokenKind) -> Result<()>;

    async fn clear_all(&self) -> Result<()> {
        for kind in TokenKind::ALL {
            self.clear(kind).await?;
        }
        Ok(())
    }

    /// 一次性读取两个 token
    async fn snapshot(&self) -> Session {
        Session {
            access_token: self.get(TokenKind::Access).await,
            refresh_token: self.get(TokenKind::Refresh).await,
        }
    }
}

/// 进程内会话存储（不持久化），用于嵌入场景和测试
#[derive(Default)]
pub struct MemorySessionStore {
    tokens: Mutex<HashMap<TokenKind, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        let store = Self::default();
        {
            let mut tokens = store.tokens.lock();
            for kind in TokenKind::ALL {
                if let Some(value) = session.token(kind) {
                    tokens.insert(kind, value.to_string());
                }
            }
        }
        store
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, kind: TokenKind) -> Option<String> {
        self.tokens.lock().get(&kind).cloned()
    }

    async fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        self.tokens.lock().insert(kind, value.to_string());
        Ok(())
    }

    async fn clear(&self, kind: TokenKind) -> Result<()> {
        self.tokens.lock().remove(&kind);
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        self.tokens.lock().clear();
        Ok(())
    }
}
