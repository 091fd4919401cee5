//! 举报审核模块
//!
//! 帖子举报与评论举报两个队列，以及举报详情和处理

pub mod api;
pub mod types;
pub mod view;

pub use api::ReportApi;
pub use types::{
    report_status_label, PostReportDetail, PostReportSummary, ReplyReportDetail,
    ReplyReportSummary, ReportDetail, ReportKind, ReportRow, ReportStatus,
};
pub use view::{ReportDetailPane, ReportView};
