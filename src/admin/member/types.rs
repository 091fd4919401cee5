//! 会员 API DTO

use crate::admin::types::deserialize_id;
use serde::{Deserialize, Serialize};

/// 会员
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_blacklisted: bool,
    #[serde(default)]
    pub report_cnt: i64,
    #[serde(default)]
    pub is_active: bool,
}

impl Member {
    pub fn active_label(&self) -> &'static str {
        if self.is_active {
            "활성"
        } else {
            "비활성"
        }
    }

    pub fn blacklist_label(&self) -> &'static str {
        if self.is_blacklisted {
            "O"
        } else {
            "X"
        }
    }

    /// 操作按钮文案
    pub fn toggle_action_label(&self) -> &'static str {
        if self.is_blacklisted {
            "블랙리스트 해제"
        } else {
            "블랙리스트 등록"
        }
    }
}

/// 会员页标签
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemberTab {
    #[default]
    All,
    Blacklist,
}

impl MemberTab {
    pub fn label(&self) -> &'static str {
        match self {
            MemberTab::All => "전체 회원",
            MemberTab::Blacklist => "블랙리스트",
        }
    }
}

/// 会员列表过滤条件（由服务器分页过滤）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberFilter {
    pub tab: MemberTab,
    /// 昵称或姓名关键字
    pub keyword: String,
}

impl MemberFilter {
    /// 转为查询参数，空条件不发送
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.tab == MemberTab::Blacklist {
            pairs.push(("blacklisted", "true".to_string()));
        }
        let keyword = self.keyword.trim();
        if !keyword.is_empty() {
            pairs.push(("keyword", keyword.to_string()));
        }
        pairs
    }
}

/// 黑名单切换请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistRequest {
    pub is_blacklisted: bool,
}
