//! FAQ API DTO

use crate::admin::error::{AdminError, AdminResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub faq_no: i64,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
}

/// 新建 / 编辑 FAQ 的请求体
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
}

impl FaqDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    pub fn validate(&self) -> AdminResult<()> {
        if self.question.trim().is_empty() || self.answer.trim().is_empty() {
            return Err(AdminError::validation("질문과 답변을 모두 입력하세요."));
        }
        Ok(())
    }
}

impl From<&Faq> for FaqDraft {
    fn from(faq: &Faq) -> Self {
        Self::new(faq.question.clone(), faq.answer.clone())
    }
}
