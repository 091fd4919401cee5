//! 集成测试用的假后台
//!
//! 在随机端口启动 axum 服务，数据保存在内存里，并记录每个请求的关键信息。

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Multipart, Path, Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use parking_lot::Mutex;
use runninghigh_admin::admin::error::AdminError;
use runninghigh_admin::admin::listener::{ErrorReporter, NavigationListener, Route};
use runninghigh_admin::{AdminClient, AdminConfig, MemorySessionStore, SessionStore};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const ACCESS_TOKEN: &str = "access-token-1";
pub const REFRESH_TOKEN: &str = "refresh-token-1";

/// 收到的请求
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    /// 同名头出现的次数
    pub authorization_count: usize,
    pub content_type_count: usize,
}

/// 收到的 multipart 字段：名称、文本值或文件名与类型
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedField {
    pub name: String,
    pub text: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Default)]
pub struct BackendState {
    pub requests: Vec<Recorded>,
    /// 除登录注册外所有接口返回 401
    pub unauthorized: bool,
    /// 登录时是否返回 token 响应头
    pub login_issues_tokens: bool,
    pub fail_blacklist: bool,
    pub fail_faq_update: bool,
    pub fail_challenge_create: bool,
    /// 处理这些编号的帖子举报时返回 500
    pub fail_resolve_reports: Vec<i64>,
    pub fail_report_list: bool,
    /// 会话校验接口返回 500
    pub fail_member_id: bool,
    /// 第 1 页会员列表的延迟
    pub slow_first_member_page: Option<Duration>,
    pub members: Vec<Value>,
    pub feedbacks: Vec<Value>,
    pub faqs: Vec<Value>,
    pub next_faq_no: i64,
    pub post_reports: Vec<Value>,
    pub reply_reports: Vec<Value>,
    pub challenges: Vec<Value>,
    pub uploads: Vec<Vec<UploadedField>>,
    pub bodies: Vec<(String, Value)>,
}

pub type Shared = Arc<Mutex<BackendState>>;

pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    pub async fn start(state: BackendState) -> Self {
        let state: Shared = Arc::new(Mutex::new(state));
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn bodies_to(&self, path: &str) -> Vec<Value> {
        self.state
            .lock()
            .bodies
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, b)| b.clone())
            .collect()
    }
}

/// 记录导航和错误提示
#[derive(Default)]
pub struct Recorder {
    pub routes: Mutex<Vec<Route>>,
    pub errors: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }
}

#[async_trait]
impl NavigationListener for Recorder {
    async fn on_navigate(&self, route: Route) {
        self.routes.lock().push(route);
    }
}

#[async_trait]
impl ErrorReporter for Recorder {
    async fn on_error(&self, operation: &str, error: &AdminError) {
        self.errors.lock().push(format!("{}: {}", operation, error));
    }
}

pub struct TestClient {
    pub client: Arc<AdminClient>,
    pub store: Arc<MemorySessionStore>,
    pub recorder: Arc<Recorder>,
}

/// 测试日志输出到测试捕获的 writer，重复调用无副作用
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("runninghigh_admin=debug"))
        .with_test_writer()
        .try_init();
}

/// 内存会话存储的客户端，`logged_in` 时预先写入 token
pub async fn test_client(backend: &FakeBackend, logged_in: bool) -> TestClient {
    init_tracing();
    let store = Arc::new(MemorySessionStore::new());
    if logged_in {
        store
            .set(runninghigh_admin::admin::session::TokenKind::Access, ACCESS_TOKEN)
            .await
            .unwrap();
        store
            .set(runninghigh_admin::admin::session::TokenKind::Refresh, REFRESH_TOKEN)
            .await
            .unwrap();
    }
    let recorder = Arc::new(Recorder::default());
    let config = AdminConfig::new(backend.base_url.clone());
    let client = AdminClient::new(&config, store.clone())
        .unwrap()
        .with_navigation_listener(recorder.clone())
        .with_error_reporter(recorder.clone());
    TestClient {
        client: Arc::new(client),
        store,
        recorder,
    }
}

pub fn member(id: i64, nickname: &str, blacklisted: bool) -> Value {
    json!({
        "id": id,
        "nickname": nickname,
        "level": 3,
        "name": format!("{} name", nickname),
        "isBlacklisted": blacklisted,
        "reportCnt": 0,
        "isActive": true
    })
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({
        "timeStamp": "2024-10-01T00:00:00",
        "status": "OK",
        "message": "success",
        "data": data
    }))
}

fn paged(items: &[Value], params: &HashMap<String, String>) -> Value {
    let page: usize = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let size: usize = params.get("size").and_then(|s| s.parse().ok()).unwrap_or(10);
    let total_pages = items.len().div_ceil(size.max(1)).max(1);
    let content: Vec<Value> = items
        .iter()
        .skip((page.saturating_sub(1)) * size)
        .take(size)
        .cloned()
        .collect();
    json!({"content": content, "currentPage": page, "totalPages": total_pages})
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/v1/sign-in/admin", put(sign_in))
        .route("/api/v1/sign-up/admin", post(sign_up))
        .route("/api/v1/member/id", get(member_id))
        .route("/api/v1/members", get(list_members))
        .route("/api/v1/members/:id/blacklist", post(set_blacklist))
        .route("/api/v1/feedbacks/admin", get(list_feedbacks))
        .route("/api/v1/feedbacks/admin/:no", put(reply_feedback))
        .route("/api/v1/faq", get(list_faqs).post(create_faq))
        .route(
            "/api/v1/faq/:no",
            get(get_faq).put(update_faq).delete(delete_faq),
        )
        .route("/api/v1/post-reports", get(list_post_reports))
        .route("/api/v1/post-reports/post", get(related_post_reports))
        .route(
            "/api/v1/post-reports/:no",
            get(post_report_detail).put(resolve_post_report),
        )
        .route("/api/v1/reply-reports", get(list_reply_reports))
        .route("/api/v1/reply-reports/reply", get(related_reply_reports))
        .route(
            "/api/v1/reply-reports/:no",
            get(reply_report_detail).put(resolve_reply_report),
        )
        .route("/api/v1/challenges/status", get(list_challenges))
        .route("/api/v1/challenges", post(create_challenge))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    // 闭包借用了 req，必须在 await 之前结束
    let recorded = {
        let header = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Recorded {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            query: req.uri().query().map(str::to_string),
            authorization: header("authorization"),
            content_type: header("content-type"),
            authorization_count: req.headers().get_all("authorization").iter().count(),
            content_type_count: req.headers().get_all("content-type").iter().count(),
        }
    };
    let anonymous = recorded.path.starts_with("/api/v1/sign-");
    let reject = {
        let mut s = state.lock();
        s.requests.push(recorded);
        s.unauthorized && !anonymous
    };
    if reject {
        return (StatusCode::UNAUTHORIZED, "token expired").into_response();
    }
    next.run(req).await
}

async fn sign_in(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let issue = {
        let mut s = state.lock();
        s.bodies.push(("/api/v1/sign-in/admin".to_string(), body));
        s.login_issues_tokens
    };
    let mut headers = HeaderMap::new();
    if issue {
        headers.insert("authorization", ACCESS_TOKEN.parse().unwrap());
        headers.insert("refresh-token", REFRESH_TOKEN.parse().unwrap());
    }
    (headers, envelope(Value::Null)).into_response()
}

async fn sign_up(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    state
        .lock()
        .bodies
        .push(("/api/v1/sign-up/admin".to_string(), body));
    envelope(Value::Null)
}

async fn member_id(State(state): State<Shared>) -> Response {
    if state.lock().fail_member_id {
        return (StatusCode::INTERNAL_SERVER_ERROR, "session check failed").into_response();
    }
    envelope(json!(1)).into_response()
}

async fn list_members(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let delay = {
        let s = state.lock();
        if params.get("page").map(String::as_str) == Some("1") {
            s.slow_first_member_page
        } else {
            None
        }
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let s = state.lock();
    let keyword = params.get("keyword").cloned().unwrap_or_default();
    let only_blacklisted = params.get("blacklisted").map(String::as_str) == Some("true");
    let items: Vec<Value> = s
        .members
        .iter()
        .filter(|m| !only_blacklisted || m["isBlacklisted"] == json!(true))
        .filter(|m| {
            keyword.is_empty()
                || m["nickname"].as_str().unwrap_or_default().contains(&keyword)
                || m["name"].as_str().unwrap_or_default().contains(&keyword)
        })
        .cloned()
        .collect();
    envelope(paged(&items, &params))
}

async fn set_blacklist(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock();
    if s.fail_blacklist {
        return (StatusCode::INTERNAL_SERVER_ERROR, "blacklist failed").into_response();
    }
    let flag = body["isBlacklisted"].clone();
    if let Some(m) = s.members.iter_mut().find(|m| m["id"] == json!(id)) {
        m["isBlacklisted"] = flag;
    }
    envelope(Value::Null).into_response()
}

async fn list_feedbacks(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let s = state.lock();
    let items: Vec<Value> = s
        .feedbacks
        .iter()
        .filter(|f| match params.get("hasReply").map(String::as_str) {
            Some("true") => f["hasReply"] == json!(true),
            Some("false") => f["hasReply"] == json!(false),
            _ => true,
        })
        .cloned()
        .collect();
    envelope(paged(&items, &params))
}

async fn reply_feedback(
    State(state): State<Shared>,
    Path(no): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut s = state.lock();
    s.bodies.push((format!("/api/v1/feedbacks/admin/{}", no), body.clone()));
    if let Some(f) = s.feedbacks.iter_mut().find(|f| f["feedbackNo"] == json!(no)) {
        f["reply"] = body["content"].clone();
        f["hasReply"] = json!(true);
    }
    envelope(Value::Null)
}

async fn list_faqs(State(state): State<Shared>) -> Json<Value> {
    envelope(Value::Array(state.lock().faqs.clone()))
}

async fn get_faq(State(state): State<Shared>, Path(no): Path<i64>) -> Response {
    let s = state.lock();
    match s.faqs.iter().find(|f| f["faqNo"] == json!(no)) {
        Some(faq) => envelope(faq.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "no faq").into_response(),
    }
}

async fn create_faq(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut s = state.lock();
    s.next_faq_no += 1;
    let faq = json!({
        "faqNo": s.next_faq_no,
        "question": body["question"],
        "answer": body["answer"]
    });
    s.faqs.push(faq);
    envelope(Value::Null)
}

async fn update_faq(
    State(state): State<Shared>,
    Path(no): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock();
    if s.fail_faq_update {
        return (StatusCode::BAD_REQUEST, "invalid faq").into_response();
    }
    s.bodies.push((format!("/api/v1/faq/{}", no), body.clone()));
    if let Some(f) = s.faqs.iter_mut().find(|f| f["faqNo"] == json!(no)) {
        f["question"] = body["question"].clone();
        f["answer"] = body["answer"].clone();
    }
    envelope(Value::Null).into_response()
}

async fn delete_faq(State(state): State<Shared>, Path(no): Path<i64>) -> Json<Value> {
    state.lock().faqs.retain(|f| f["faqNo"] != json!(no));
    envelope(Value::Null)
}

async fn list_post_reports(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let s = state.lock();
    if s.fail_report_list {
        return (StatusCode::SERVICE_UNAVAILABLE, "list unavailable").into_response();
    }
    envelope(paged(&s.post_reports, &params)).into_response()
}

async fn list_reply_reports(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    envelope(paged(&state.lock().reply_reports, &params))
}

async fn related_post_reports(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let target = params.get("postNo").cloned().unwrap_or_default();
    let s = state.lock();
    let rows: Vec<Value> = s
        .post_reports
        .iter()
        .filter(|r| r["reportedPostNo"].to_string().trim_matches('"') == target)
        .cloned()
        .collect();
    envelope(Value::Array(rows))
}

async fn related_reply_reports(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let target = params.get("replyNo").cloned().unwrap_or_default();
    let s = state.lock();
    let rows: Vec<Value> = s
        .reply_reports
        .iter()
        .filter(|r| r["reportedReplyNo"].to_string().trim_matches('"') == target)
        .cloned()
        .collect();
    envelope(Value::Array(rows))
}

async fn post_report_detail(State(state): State<Shared>, Path(no): Path<i64>) -> Response {
    let s = state.lock();
    match s.post_reports.iter().find(|r| r["postReportNo"] == json!(no)) {
        Some(r) => {
            let mut detail = r.clone();
            detail["imageUrl"] = json!("https://cdn.example/post.png");
            envelope(detail).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no report").into_response(),
    }
}

async fn reply_report_detail(State(state): State<Shared>, Path(no): Path<i64>) -> Response {
    let s = state.lock();
    match s.reply_reports.iter().find(|r| r["replyReportNo"] == json!(no)) {
        Some(r) => envelope(r.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, "no report").into_response(),
    }
}

async fn resolve_post_report(
    State(state): State<Shared>,
    Path(no): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut s = state.lock();
    if s.fail_resolve_reports.contains(&no) {
        return (StatusCode::CONFLICT, "already resolved").into_response();
    }
    if let Some(r) = s.post_reports.iter_mut().find(|r| r["postReportNo"] == json!(no)) {
        r["status"] = body["status"].clone();
    }
    envelope(Value::Null).into_response()
}

async fn resolve_reply_report(
    State(state): State<Shared>,
    Path(no): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut s = state.lock();
    if let Some(r) = s
        .reply_reports
        .iter_mut()
        .find(|r| r["replyReportNo"] == json!(no))
    {
        r["status"] = body["status"].clone();
    }
    envelope(Value::Null)
}

async fn list_challenges(
    State(state): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let status = params.get("status").cloned().unwrap_or_default();
    let s = state.lock();
    let list: Vec<Value> = s
        .challenges
        .iter()
        .filter(|c| c["status"] == json!(status))
        .cloned()
        .collect();
    let count = list.len();
    envelope(json!({"challengeList": list, "challengeCount": count}))
}

async fn create_challenge(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let text = if file_name.is_none() {
            field.text().await.ok()
        } else {
            let _ = field.bytes().await;
            None
        };
        fields.push(UploadedField {
            name,
            text,
            file_name,
            content_type,
        });
    }
    let mut s = state.lock();
    if s.fail_challenge_create {
        s.uploads.push(fields);
        return (StatusCode::INTERNAL_SERVER_ERROR, "upload failed").into_response();
    }
    let text = |name: &str| {
        fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.text.clone())
            .unwrap_or_default()
    };
    let challenge_no = s.challenges.len() + 1;
    let challenge = json!({
        "challengeNo": challenge_no,
        "title": text("title"),
        "category": text("challengeCategory"),
        "imageUrl": "https://cdn.example/challenge.png",
        "startDate": text("startDate"),
        "endDate": text("endDate"),
        "status": "IN_PROGRESS",
        "remainingTime": 10,
        "participantsCount": 0
    });
    s.challenges.push(challenge);
    s.uploads.push(fields);
    envelope(Value::Null).into_response()
}
