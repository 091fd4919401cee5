mod common;

use common::{
    init_tracing, test_client, BackendState, FakeBackend, Recorder, ACCESS_TOKEN, REFRESH_TOKEN,
};
use futures_util::future::join_all;
use runninghigh_admin::admin::auth::hash_password;
use runninghigh_admin::admin::listener::Route;
use runninghigh_admin::admin::session::TokenKind;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use runninghigh_admin::{
    AdminClient, AdminConfig, AdminError, AuthService, MemorySessionStore, RequestOptions,
    SessionStore, SqliteSessionStore,
};
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn no_authorization_header_without_token() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let t = test_client(&backend, false).await;

    let _: Value = t
        .client
        .fetch_data("获取FAQ列表", "/api/v1/faq", RequestOptions::get())
        .await
        .unwrap();

    let requests = backend.requests_to("/api/v1/faq");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization, None);
}

#[tokio::test]
async fn raw_token_is_sent_without_scheme() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let t = test_client(&backend, true).await;

    let _: Value = t
        .client
        .fetch_data("获取FAQ列表", "/api/v1/faq", RequestOptions::get())
        .await
        .unwrap();

    let requests = backend.requests_to("/api/v1/faq");
    assert_eq!(requests[0].authorization.as_deref(), Some(ACCESS_TOKEN));
    assert_eq!(
        requests[0].content_type.as_deref(),
        Some("application/json")
    );
}

#[tokio::test]
async fn caller_headers_are_replaced_not_duplicated() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let t = test_client(&backend, true).await;

    let options = RequestOptions::get()
        .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .header(AUTHORIZATION, HeaderValue::from_static("stale-token"));
    let _: Value = t
        .client
        .fetch_data("获取FAQ列表", "/api/v1/faq", options)
        .await
        .unwrap();

    let request = &backend.requests_to("/api/v1/faq")[0];
    assert_eq!(request.content_type_count, 1);
    assert_eq!(request.authorization_count, 1);
    assert_eq!(request.content_type.as_deref(), Some("application/json"));
    assert_eq!(request.authorization.as_deref(), Some(ACCESS_TOKEN));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = Arc::new(MemorySessionStore::new());
    store.set(TokenKind::Access, ACCESS_TOKEN).await.unwrap();
    let recorder = Arc::new(Recorder::default());
    let client = AdminClient::new(&AdminConfig::new(format!("http://{}", addr)), store.clone())
        .unwrap()
        .with_navigation_listener(recorder.clone())
        .with_error_reporter(recorder.clone());

    let err = client
        .fetch_data::<Value>("获取FAQ列表", "/api/v1/faq", RequestOptions::get())
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Network(_)));
    assert_eq!(err.status(), None);
    assert_eq!(recorder.errors().len(), 1);
    assert!(recorder.routes().is_empty());
    assert_eq!(
        store.get(TokenKind::Access).await.as_deref(),
        Some(ACCESS_TOKEN)
    );
}

#[tokio::test]
async fn concurrent_unauthorized_responses_navigate_once() {
    let backend = FakeBackend::start(BackendState {
        unauthorized: true,
        ..Default::default()
    })
    .await;
    let t = test_client(&backend, true).await;

    let results = join_all((0..5).map(|_| {
        t.client
            .fetch_data::<Value>("获取会员列表", "/api/v1/members", RequestOptions::get())
    }))
    .await;

    assert!(results
        .iter()
        .all(|r| matches!(r, Err(AdminError::Unauthorized))));
    assert_eq!(t.recorder.routes(), vec![Route::Login]);
    assert_eq!(t.store.get(TokenKind::Access).await, None);
    assert_eq!(t.store.get(TokenKind::Refresh).await, None);
}

#[tokio::test]
async fn new_session_re_arms_unauthorized_redirect() {
    let backend = FakeBackend::start(BackendState {
        unauthorized: true,
        login_issues_tokens: true,
        ..Default::default()
    })
    .await;
    let t = test_client(&backend, true).await;
    let auth = AuthService::new(t.client.clone());

    let _ = t
        .client
        .execute("获取会员列表", "/api/v1/members", RequestOptions::get())
        .await;
    assert!(auth.login("admin", "secret").await.unwrap());
    let _ = t
        .client
        .execute("获取会员列表", "/api/v1/members", RequestOptions::get())
        .await;

    assert_eq!(
        t.recorder.routes(),
        vec![Route::Login, Route::Main, Route::Login]
    );
}

#[tokio::test]
async fn login_without_token_headers_is_a_no_op() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let t = test_client(&backend, false).await;
    let auth = AuthService::new(t.client.clone());

    let stored = auth.login("admin", "secret").await.unwrap();

    assert!(!stored);
    assert_eq!(t.store.get(TokenKind::Access).await, None);
    assert!(t.recorder.routes().is_empty());
}

#[tokio::test]
async fn login_hashes_password_and_stores_tokens() {
    let backend = FakeBackend::start(BackendState {
        login_issues_tokens: true,
        ..Default::default()
    })
    .await;
    let t = test_client(&backend, false).await;
    let auth = AuthService::new(t.client.clone());

    assert!(auth.login("admin", "secret").await.unwrap());

    let bodies = backend.bodies_to("/api/v1/sign-in/admin");
    assert_eq!(bodies[0]["account"], "admin");
    assert_eq!(bodies[0]["password"], hash_password("secret"));
    assert_eq!(
        t.store.get(TokenKind::Access).await.as_deref(),
        Some(ACCESS_TOKEN)
    );
    assert_eq!(
        t.store.get(TokenKind::Refresh).await.as_deref(),
        Some(REFRESH_TOKEN)
    );
    assert_eq!(t.recorder.routes(), vec![Route::Main]);
}

#[tokio::test]
async fn login_with_blank_fields_is_reported() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let t = test_client(&backend, false).await;
    let auth = AuthService::new(t.client.clone());

    let err = auth.login("admin", " ").await.unwrap_err();

    assert!(matches!(err, AdminError::Validation(_)));
    assert!(backend.requests_to("/api/v1/sign-in/admin").is_empty());
    assert_eq!(t.recorder.errors().len(), 1);
}

#[tokio::test]
async fn signup_sends_invite_code_and_switches_tab() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let t = test_client(&backend, false).await;
    let auth = AuthService::new(t.client.clone());
    auth.set_tab(runninghigh_admin::admin::AuthTab::Signup);

    auth.signup("admin", "secret", "INVITE-1").await.unwrap();

    let bodies = backend.bodies_to("/api/v1/sign-up/admin");
    assert_eq!(bodies[0]["inviteCode"], "INVITE-1");
    assert_eq!(bodies[0]["password"], hash_password("secret"));
    assert_eq!(auth.active_tab(), runninghigh_admin::admin::AuthTab::Login);
}

#[tokio::test]
async fn session_check_routes_by_token_state() {
    let backend = FakeBackend::start(BackendState::default()).await;

    let anonymous = test_client(&backend, false).await;
    assert_eq!(
        AuthService::new(anonymous.client.clone())
            .check_session()
            .await,
        Route::Login
    );
    assert!(backend.requests_to("/api/v1/member/id").is_empty());

    let logged_in = test_client(&backend, true).await;
    assert_eq!(
        AuthService::new(logged_in.client.clone())
            .check_session()
            .await,
        Route::Main
    );
    assert_eq!(logged_in.recorder.routes(), vec![Route::Main]);
}

#[tokio::test]
async fn failed_session_check_clears_tokens_and_routes_to_login() {
    let backend = FakeBackend::start(BackendState {
        fail_member_id: true,
        ..Default::default()
    })
    .await;
    let t = test_client(&backend, true).await;

    let route = AuthService::new(t.client.clone()).check_session().await;

    assert_eq!(route, Route::Login);
    assert_eq!(t.store.get(TokenKind::Access).await, None);
    assert_eq!(t.store.get(TokenKind::Refresh).await, None);
    assert_eq!(t.recorder.routes(), vec![Route::Login]);
    assert_eq!(t.recorder.errors().len(), 1);
    assert_eq!(backend.requests_to("/api/v1/member/id").len(), 1);
}

#[tokio::test]
async fn logout_clears_tokens_and_navigates() {
    let backend = FakeBackend::start(BackendState::default()).await;
    let t = test_client(&backend, true).await;

    AuthService::new(t.client.clone()).logout().await.unwrap();

    assert!(t.store.snapshot().await.is_empty());
    assert_eq!(t.recorder.routes(), vec![Route::Login]);
}

#[tokio::test]
async fn sqlite_session_survives_reconnect() {
    let backend = FakeBackend::start(BackendState {
        login_issues_tokens: true,
        ..Default::default()
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("session.db").display()
    );
    let config = AdminConfig::new(backend.base_url.clone()).with_session_db_url(db_url.clone());

    {
        let client = Arc::new(AdminClient::connect(&config).await.unwrap());
        assert!(AuthService::new(client).login("admin", "secret").await.unwrap());
    }

    let client = AdminClient::connect(&config).await.unwrap();
    let _: Value = client
        .fetch_data("获取FAQ列表", "/api/v1/faq", RequestOptions::get())
        .await
        .unwrap();
    let requests = backend.requests_to("/api/v1/faq");
    assert_eq!(requests[0].authorization.as_deref(), Some(ACCESS_TOKEN));

    let other_origin = SqliteSessionStore::connect(&db_url, "http://other.example".to_string())
        .await
        .unwrap();
    assert_eq!(other_origin.get(TokenKind::Access).await, None);
}
