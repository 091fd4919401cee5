//! 带认证的请求客户端
//!
//! 所有页面都通过 [`AdminClient`] 访问后台 REST API：
//! - 每次请求都从会话存储读取 access token，存在时原样放入 `Authorization` 头（不加 `Bearer ` 前缀）
//! - 非 multipart 请求统一设置 `Content-Type: application/json`，multipart 交给传输层生成 boundary
//! - 401 时清空会话并跳转登录页（并发的多个 401 只跳转一次）
//! - 不设置超时，不做任何自动重试

use crate::admin::config::AdminConfig;
use crate::admin::error::{AdminError, AdminResult};
use crate::admin::listener::{
    EmptyNavigationListener, ErrorReporter, LogErrorReporter, NavigationListener, Route,
};
use crate::admin::session::{Session, SessionStore, SqliteSessionStore, TokenKind};
use crate::admin::types::decode_envelope;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;
use uuid::Uuid;

/// 请求体：JSON 值或 multipart 表单
pub enum RequestBody {
    Json(serde_json::Value),
    Multipart(reqwest::multipart::Form),
}

impl RequestBody {
    fn is_multipart(&self) -> bool {
        matches!(self, RequestBody::Multipart(_))
    }
}

/// 单次请求的参数
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<RequestBody>,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    /// 匿名请求：不携带 token，401 也不触发登出跳转（登录、注册使用）
    pub anonymous: bool,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            body: None,
            headers: HeaderMap::new(),
            query: Vec::new(),
            anonymous: false,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// 设置 JSON 请求体
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> AdminResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| AdminError::validation(format!("请求体无法序列化: {}", e)))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// 管理端 HTTP 客户端
pub struct AdminClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn NavigationListener>,
    reporter: Arc<dyn ErrorReporter>,
    // 已经因为 401 触发过跳转，重新登录前不再重复跳转
    redirecting: AtomicBool,
}

impl AdminClient {
    /// 使用指定的会话存储创建客户端
    pub fn new(config: &AdminConfig, session: Arc<dyn SessionStore>) -> AdminResult<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            AdminError::validation(format!("无效的 API 地址 {}: {}", config.api_base_url, e))
        })?;

        let http = reqwest::ClientBuilder::new()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(AdminError::Network)?;

        info!("[AdminClient] 创建客户端，API: {}", base_url);

        Ok(Self {
            http,
            base_url,
            session,
            navigator: Arc::new(EmptyNavigationListener),
            reporter: Arc::new(LogErrorReporter),
            redirecting: AtomicBool::new(false),
        })
    }

    /// 打开 SQLite 会话存储（按 API 源隔离）并创建客户端
    pub async fn connect(config: &AdminConfig) -> AdminResult<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            AdminError::validation(format!("无效的 API 地址 {}: {}", config.api_base_url, e))
        })?;
        let scope = base_url.origin().ascii_serialization();
        let store = SqliteSessionStore::connect(&config.session_db_url, scope).await?;
        Self::new(config, Arc::new(store))
    }

    /// 注册导航监听器
    pub fn with_navigation_listener(mut self, listener: Arc<dyn NavigationListener>) -> Self {
        self.navigator = listener;
        self
    }

    /// 注册错误提示接口
    pub fn with_error_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 解析请求地址：绝对 URL 原样使用，否则相对 API 基础地址拼接
    pub fn resolve_url(&self, path: &str) -> AdminResult<Url> {
        match Url::parse(path) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .base_url
                .join(path)
                .map_err(|e| AdminError::validation(format!("无效的请求路径 {}: {}", path, e))),
            Err(e) => Err(AdminError::validation(format!(
                "无效的请求路径 {}: {}",
                path, e
            ))),
        }
    }

    /// 发起请求，成功时原样返回响应供调用方解析
    pub async fn request(
        &self,
        operation: &str,
        path: &str,
        options: RequestOptions,
    ) -> AdminResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let mut url = self.resolve_url(path)?;
        if !options.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &options.query {
                pairs.append_pair(k, v);
            }
        }

        info!("[AdminClient] 📡 {} {} {}", operation, options.method, url.path());
        debug!("[AdminClient]   请求URL: {}, 请求ID: {}", url, request_id);

        // insert 覆盖同名头，调用方传入的 Authorization / Content-Type 不会重复发送
        let mut headers = options.headers;
        if !options.anonymous {
            // 每次都从存储读取，不在内存中缓存
            if let Some(token) = self.session.get(TokenKind::Access).await {
                let value = HeaderValue::from_str(&token)
                    .map_err(|e| AdminError::validation(format!("无效的 token: {}", e)))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        let is_multipart = options.body.as_ref().is_some_and(RequestBody::is_multipart);
        if is_multipart {
            headers.remove(CONTENT_TYPE);
        } else {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let mut builder = self
            .http
            .request(options.method.clone(), url.clone())
            .headers(headers);
        match options.body {
            Some(RequestBody::Json(value)) => {
                let bytes = serde_json::to_vec(&value)
                    .map_err(|e| AdminError::validation(format!("请求体无法序列化: {}", e)))?;
                builder = builder.body(bytes);
            }
            Some(RequestBody::Multipart(form)) => {
                builder = builder.multipart(form);
            }
            None => {}
        }

        let response = match builder.send().await {
            Ok(resp) => resp,
            Err(e) => {
                error!("[AdminClient] {}请求失败（网络）: {}", operation, e);
                let err = AdminError::Network(e);
                self.reporter.on_error(operation, &err).await;
                return Err(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!("[AdminClient] {}请求成功，HTTP状态: {}", operation, status);
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(
            "[AdminClient] {}请求失败，HTTP状态: {}, 响应: {}",
            operation, status, body
        );

        if status == reqwest::StatusCode::UNAUTHORIZED && !options.anonymous {
            self.handle_unauthorized().await;
            return Err(AdminError::Unauthorized);
        }

        let err = AdminError::Api {
            status: status.as_u16(),
            body,
        };
        self.reporter.on_error(operation, &err).await;
        Err(err)
    }

    /// 请求并解析信封中的 data
    pub async fn fetch_data<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        options: RequestOptions,
    ) -> AdminResult<T> {
        let response = self.request(operation, path, options).await?;
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                let err = AdminError::Network(e);
                self.reporter.on_error(operation, &err).await;
                return Err(err);
            }
        };

        let decoded = decode_envelope::<T>(&body, operation).and_then(|r| r.into_data(operation));
        if let Err(err) = &decoded {
            self.reporter.on_error(operation, err).await;
        }
        decoded
    }

    /// 请求但不关心响应体（变更类接口）
    pub async fn execute(
        &self,
        operation: &str,
        path: &str,
        options: RequestOptions,
    ) -> AdminResult<()> {
        let response = self.request(operation, path, options).await?;
        let body = response.bytes().await.unwrap_or_default();
        debug!(
            "[AdminClient] {}响应 Body: {}",
            operation,
            String::from_utf8_lossy(&body)
        );
        Ok(())
    }

    /// 保存新会话（登录成功后调用），并重新允许 401 跳转
    pub async fn start_session(&self, session: &Session) -> AdminResult<()> {
        for kind in TokenKind::ALL {
            match session.token(kind) {
                Some(value) => self.session.set(kind, value).await?,
                None => self.session.clear(kind).await?,
            }
        }
        self.redirecting.store(false, Ordering::SeqCst);
        info!("[AdminClient] ✅ 会话已保存");
        Ok(())
    }

    /// 主动登出：清空全部 token 并跳转登录页
    pub async fn end_session(&self) -> AdminResult<()> {
        self.session.clear_all().await?;
        info!("[AdminClient] 👋 已登出");
        self.navigator.on_navigate(Route::Login).await;
        Ok(())
    }

    pub async fn navigate(&self, route: Route) {
        self.navigator.on_navigate(route).await;
    }

    /// 把错误交给统一的提示接口（页面校验失败时使用）
    pub async fn report(&self, operation: &str, err: &AdminError) {
        self.reporter.on_error(operation, err).await;
    }

    async fn handle_unauthorized(&self) {
        warn!("[AdminClient] ⚠️ 未授权访问，清空会话");
        if let Err(e) = self.session.clear_all().await {
            error!("[AdminClient] 清空会话失败: {:?}", e);
        }
        if !self.redirecting.swap(true, Ordering::SeqCst) {
            self.navigator.on_navigate(Route::Login).await;
        } else {
            debug!("[AdminClient] 已在跳转登录页，忽略重复的 401");
        }
    }
}
