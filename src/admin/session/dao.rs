//! 会话数据访问层（DAO）
//!
//! 用 SQLite 表 `local_session_tokens` 持久化 token，进程重启后依然有效。
//! 按 scope（API 源）隔离，同一个库文件可以服务多个后台环境。

use crate::admin::db::create_sqlite_pool_with_migration;
use crate::admin::session::models::TokenKind;
use crate::admin::session::store::SessionStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, error, info};

/// 基于 sqlx 的会话存储
pub struct SqliteSessionStore {
    db: Pool<Sqlite>,
    scope: String,
}

impl SqliteSessionStore {
    /// 使用已有连接池创建（表结构由 sqlx migration 管理）
    pub fn new(db: Pool<Sqlite>, scope: String) -> Self {
        Self { db, scope }
    }

    /// 连接数据库、执行迁移并创建存储
    pub async fn connect(db_url: &str, scope: String) -> Result<Self> {
        let db = create_sqlite_pool_with_migration(db_url).await?;
        info!("[SessionDAO] 会话存储已打开，scope: {}", scope);
        Ok(Self::new(db, scope))
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    async fn load(&self, kind: TokenKind) -> Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT token_value
            FROM local_session_tokens
            WHERE scope = ? AND token_name = ?
            "#,
        )
        .bind(&self.scope)
        .bind(kind.key())
        .fetch_optional(&self.db)
        .await
        .context("查询会话 token 失败")?;

        Ok(row.map(|m| m.get::<String, _>("token_value")))
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn get(&self, kind: TokenKind) -> Option<String> {
        match self.load(kind).await {
            Ok(value) => value,
            Err(e) => {
                error!("[SessionDAO] 读取 {} 失败，按未登录处理: {:?}", kind.key(), e);
                None
            }
        }
    }

    async fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        let sql = r#"
            INSERT INTO local_session_tokens (
                scope, token_name, token_value, update_time
            ) VALUES (?, ?, ?, ?)
            ON CONFLICT(scope, token_name) DO UPDATE SET
                token_value = excluded.token_value,
                update_time = excluded.update_time
        "#;

        sqlx::query(sql)
            .bind(&self.scope)
            .bind(kind.key())
            .bind(value)
            .bind(Utc::now().timestamp_millis())
            .execute(&self.db)
            .await
            .context("保存会话 token 失败")?;

        debug!("[SessionDAO] 已保存 {}", kind.key());
        Ok(())
    }

    async fn clear(&self, kind: TokenKind) -> Result<()> {
        sqlx::query("DELETE FROM local_session_tokens WHERE scope = ? AND token_name = ?")
            .bind(&self.scope)
            .bind(kind.key())
            .execute(&self.db)
            .await
            .context("删除会话 token 失败")?;

        debug!("[SessionDAO] 已删除 {}", kind.key());
        Ok(())
    }

    async fn clear_all(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM local_session_tokens WHERE scope = ?")
            .bind(&self.scope)
            .execute(&self.db)
            .await
            .context("清空会话 token 失败")?;

        info!(
            "[SessionDAO] 已清空会话，scope: {}，删除 {} 条",
            self.scope,
            result.rows_affected()
        );
        Ok(())
    }
}
