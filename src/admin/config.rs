//! 管理端客户端配置

/// 默认每页条数（与后台各列表页一致）
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// 客户端配置
#[derive(Clone, Debug)]
pub struct AdminConfig {
    /// REST API 基础地址，例如 `http://localhost:8080`
    pub api_base_url: String,
    /// 会话 token 持久化使用的 SQLite 数据库 URL
    ///
    /// 例如：`sqlite://runninghigh-admin.db?mode=rwc`
    pub session_db_url: String,
    /// 分页列表的每页条数
    pub page_size: u32,
    /// 请求使用的 User-Agent
    pub user_agent: String,
}

impl AdminConfig {
    /// 创建默认配置
    pub fn new(api_base_url: String) -> Self {
        Self {
            api_base_url,
            session_db_url: "sqlite://runninghigh-admin.db?mode=rwc".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            user_agent: format!("runninghigh-admin/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_session_db_url(mut self, session_db_url: String) -> Self {
        self.session_db_url = session_db_url;
        self
    }

    /// 设置每页条数，0 会被提升为 1
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }
}
