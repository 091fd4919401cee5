pub mod auth;
pub mod challenge;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod faq;
pub mod feedback;
pub mod listener;
pub mod member;
pub mod pagination;
pub mod render;
pub mod report;
pub mod session;
pub mod types;

// 重新导出各页面入口
pub use auth::{AuthService, AuthTab};
pub use challenge::ChallengeView;
pub use faq::FaqView;
pub use feedback::FeedbackView;
pub use member::MemberView;
pub use report::ReportView;

// 重新导出请求层与分页
pub use client::{AdminClient, RequestBody, RequestOptions};
pub use config::{AdminConfig, DEFAULT_PAGE_SIZE};
pub use error::{AdminError, AdminResult};
pub use listener::{ErrorReporter, NavigationListener, Route};
pub use pagination::{LoadOutcome, LoadState, PageControls, PagedQuery};
