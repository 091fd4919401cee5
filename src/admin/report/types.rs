//! 举报 API DTO

use crate::admin::types::deserialize_id;
use serde::{Deserialize, Serialize};

/// 举报对象类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Post,
    Reply,
}

impl ReportKind {
    /// 举报队列路径
    pub fn collection_path(&self) -> &'static str {
        match self {
            ReportKind::Post => "/api/v1/post-reports",
            ReportKind::Reply => "/api/v1/reply-reports",
        }
    }

    /// 同一对象的全部举报：路径和查询参数名
    pub fn related_endpoint(&self) -> (&'static str, &'static str) {
        match self {
            ReportKind::Post => ("/api/v1/post-reports/post", "postNo"),
            ReportKind::Reply => ("/api/v1/reply-reports/reply", "replyNo"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportKind::Post => "게시글",
            ReportKind::Reply => "댓글",
        }
    }
}

/// 举报处理状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStatus {
    InProgress,
    Accepted,
    Rejected,
}

impl ReportStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ReportStatus::InProgress => "INPROGRESS",
            ReportStatus::Accepted => "ACCEPTED",
            ReportStatus::Rejected => "REJECTED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INPROGRESS" => Some(ReportStatus::InProgress),
            "ACCEPTED" => Some(ReportStatus::Accepted),
            "REJECTED" => Some(ReportStatus::Rejected),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::InProgress => "처리중",
            ReportStatus::Accepted => "신고 수락",
            ReportStatus::Rejected => "신고거절",
        }
    }
}

/// 状态显示文案，未知状态原样返回
pub fn report_status_label(status: &str) -> String {
    ReportStatus::from_code(status)
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| status.to_string())
}

/// 帖子举报（列表项）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReportSummary {
    pub post_report_no: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reporter_no: i64,
    #[serde(deserialize_with = "deserialize_id")]
    pub reported_post_no: String,
    #[serde(default)]
    pub post_content: String,
}

/// 评论举报（列表项）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyReportSummary {
    pub reply_report_no: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reporter_no: i64,
    #[serde(deserialize_with = "deserialize_id")]
    pub reported_reply_no: String,
    #[serde(default)]
    pub reply_content: String,
}

/// 举报列表行（服务器负载不带类型标记，在解码处包装）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportRow {
    Post(PostReportSummary),
    Reply(ReplyReportSummary),
}

impl ReportRow {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportRow::Post(_) => ReportKind::Post,
            ReportRow::Reply(_) => ReportKind::Reply,
        }
    }

    pub fn report_no(&self) -> i64 {
        match self {
            ReportRow::Post(r) => r.post_report_no,
            ReportRow::Reply(r) => r.reply_report_no,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            ReportRow::Post(r) => &r.category,
            ReportRow::Reply(r) => &r.category,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            ReportRow::Post(r) => &r.content,
            ReportRow::Reply(r) => &r.content,
        }
    }

    pub fn status(&self) -> &str {
        match self {
            ReportRow::Post(r) => &r.status,
            ReportRow::Reply(r) => &r.status,
        }
    }

    pub fn reporter_no(&self) -> i64 {
        match self {
            ReportRow::Post(r) => r.reporter_no,
            ReportRow::Reply(r) => r.reporter_no,
        }
    }

    /// 被举报的帖子 / 评论编号
    pub fn target_no(&self) -> &str {
        match self {
            ReportRow::Post(r) => &r.reported_post_no,
            ReportRow::Reply(r) => &r.reported_reply_no,
        }
    }

    pub fn target_content(&self) -> &str {
        match self {
            ReportRow::Post(r) => &r.post_content,
            ReportRow::Reply(r) => &r.reply_content,
        }
    }
}

/// 帖子举报详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostReportDetail {
    pub post_report_no: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub reported_post_no: String,
    #[serde(default)]
    pub post_content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// 评论举报详情
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyReportDetail {
    pub reply_report_no: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub status: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub reported_reply_no: String,
    #[serde(default)]
    pub reply_content: String,
}

/// 举报详情
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ReportDetail {
    Post(PostReportDetail),
    Reply(ReplyReportDetail),
}

impl ReportDetail {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportDetail::Post(_) => ReportKind::Post,
            ReportDetail::Reply(_) => ReportKind::Reply,
        }
    }

    pub fn report_no(&self) -> i64 {
        match self {
            ReportDetail::Post(d) => d.post_report_no,
            ReportDetail::Reply(d) => d.reply_report_no,
        }
    }

    pub fn target_no(&self) -> &str {
        match self {
            ReportDetail::Post(d) => &d.reported_post_no,
            ReportDetail::Reply(d) => &d.reported_reply_no,
        }
    }

    pub fn target_content(&self) -> &str {
        match self {
            ReportDetail::Post(d) => &d.post_content,
            ReportDetail::Reply(d) => &d.reply_content,
        }
    }

    /// 只有帖子举报可能带图片
    pub fn image_url(&self) -> Option<&str> {
        match self {
            ReportDetail::Post(d) => d.image_url.as_deref().filter(|u| !u.is_empty()),
            ReportDetail::Reply(_) => None,
        }
    }
}

/// 举报处理请求
#[derive(Debug, Clone, Serialize)]
pub struct ResolveReportRequest {
    pub status: String,
}
