//! 挑战 API DTO 与新建表单

use crate::admin::error::{AdminError, AdminResult};
use crate::admin::types::deserialize_vec_or_null;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 挑战生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeStatus {
    Scheduled,
    #[default]
    InProgress,
    Completed,
}

impl ChallengeStatus {
    pub const ALL: [ChallengeStatus; 3] = [
        ChallengeStatus::Scheduled,
        ChallengeStatus::InProgress,
        ChallengeStatus::Completed,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ChallengeStatus::Scheduled => "SCHEDULED",
            ChallengeStatus::InProgress => "IN_PROGRESS",
            ChallengeStatus::Completed => "COMPLETED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChallengeStatus::Scheduled => "예정",
            ChallengeStatus::InProgress => "진행중",
            ChallengeStatus::Completed => "종료",
        }
    }
}

/// 状态显示文案，未知状态原样返回
pub fn challenge_status_label(status: &str) -> String {
    ChallengeStatus::from_code(status)
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| status.to_string())
}

/// 挑战类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChallengeCategory {
    #[default]
    Distance,
    Speed,
    Attendance,
}

impl ChallengeCategory {
    pub const ALL: [ChallengeCategory; 3] = [
        ChallengeCategory::Distance,
        ChallengeCategory::Speed,
        ChallengeCategory::Attendance,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ChallengeCategory::Distance => "DISTANCE",
            ChallengeCategory::Speed => "SPEED",
            ChallengeCategory::Attendance => "ATTENDANCE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChallengeCategory::Distance => "거리",
            ChallengeCategory::Speed => "속도",
            ChallengeCategory::Attendance => "출석",
        }
    }
}

pub fn challenge_category_label(category: &str) -> String {
    ChallengeCategory::from_code(category)
        .map(|c| c.label().to_string())
        .unwrap_or_else(|| category.to_string())
}

/// 挑战列表项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Challenge {
    pub challenge_no: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub remaining_time: i64,
    #[serde(default)]
    pub participants_count: i64,
}

/// 按状态查询的响应
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeList {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub challenge_list: Vec<Challenge>,
    #[serde(default)]
    pub challenge_count: i64,
}

/// 上传的挑战图片
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ChallengeImage {
    /// MIME 按文件扩展名推断
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            bytes,
            mime,
        }
    }

    /// 从本地文件读取
    pub async fn from_path(path: &Path) -> AdminResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AdminError::validation(format!("读取图片失败 {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// 新建挑战表单
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewChallenge {
    pub title: String,
    pub content: String,
    pub category: ChallengeCategory,
    pub goal: u32,
    pub goal_detail: String,
    pub start_date: String,
    pub end_date: String,
    pub image: Option<ChallengeImage>,
}

impl NewChallenge {
    /// 提交前的必填校验，图片缺失单独提示
    pub fn validate(&self) -> AdminResult<()> {
        if self.image.is_none() {
            return Err(AdminError::validation("이미지를 선택해주세요."));
        }
        let missing: Vec<&str> = [
            ("title", &self.title),
            ("content", &self.content),
            ("goalDetail", &self.goal_detail),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(AdminError::validation(format!(
                "必填项为空: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// 构造 multipart 表单，先做校验；草稿本身不被消耗，失败后可以重试
    pub fn to_form(&self) -> AdminResult<Form> {
        self.validate()?;
        let Some(image) = &self.image else {
            return Err(AdminError::validation("이미지를 선택해주세요."));
        };
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime)
            .map_err(|e| AdminError::validation(format!("图片类型无效: {}", e)))?;
        Ok(Form::new()
            .text("title", self.title.clone())
            .text("content", self.content.clone())
            .text("challengeCategory", self.category.code())
            .text("goal", self.goal.to_string())
            .text("goalDetail", self.goal_detail.clone())
            .text("startDate", self.start_date.clone())
            .text("endDate", self.end_date.clone())
            .part("image", part))
    }
}
