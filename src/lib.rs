pub mod admin;

// 重新导出常用类型，方便外部使用
pub use admin::{
    client::{AdminClient, RequestOptions},
    config::AdminConfig,
    error::{AdminError, AdminResult},
    pagination::PagedQuery,
    session::{MemorySessionStore, Session, SessionStore, SqliteSessionStore},
    AuthService, ChallengeView, FaqView, FeedbackView, MemberView, ReportView,
};
