//! 反馈 API DTO

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// 用户反馈
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub feedback_no: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub create_date: String,
    #[serde(default)]
    pub update_date: String,
    #[serde(default)]
    pub has_reply: bool,
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub nickname: String,
}

impl Feedback {
    /// 已有回复（去掉首尾空白），用于初始化草稿
    pub fn trimmed_reply(&self) -> String {
        self.reply.as_deref().map(str::trim).unwrap_or_default().to_string()
    }

    pub fn reply_action_label(&self) -> &'static str {
        if self.has_reply {
            "답변 수정"
        } else {
            "답변 제출"
        }
    }
}

/// 回复状态过滤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFilter {
    #[default]
    All,
    Replied,
    Unreplied,
}

impl ReplyFilter {
    /// `hasReply` 查询参数，全部时不带
    pub fn has_reply(&self) -> Option<bool> {
        match self {
            ReplyFilter::All => None,
            ReplyFilter::Replied => Some(true),
            ReplyFilter::Unreplied => Some(false),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReplyFilter::All => "전체",
            ReplyFilter::Replied => "답변 완료",
            ReplyFilter::Unreplied => "미답변",
        }
    }
}

/// 反馈 PUT 请求体
#[derive(Debug, Clone, Serialize)]
pub struct ReplyRequest {
    pub content: String,
}

/// 日期显示为 `YYYY-MM-DD HH:MM:SS`，无法解析时原样返回
pub fn format_timestamp(raw: &str) -> String {
    const OUTPUT: &str = "%Y-%m-%d %H:%M:%S";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUTPUT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(OUTPUT).to_string();
        }
    }
    raw.to_string()
}
