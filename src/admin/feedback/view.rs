//! 反馈管理页
//!
//! 每条反馈有一份回复草稿，每次加载成功后用服务器上的回复重新初始化。
//! 提交失败时草稿保留，便于重试。

use crate::admin::client::AdminClient;
use crate::admin::error::AdminResult;
use crate::admin::feedback::api::FeedbackApi;
use crate::admin::feedback::types::{format_timestamp, Feedback, ReplyFilter};
use crate::admin::pagination::{LoadOutcome, PageFetcher, PagedQuery};
use crate::admin::render::Table;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

pub struct FeedbackView {
    client: Arc<AdminClient>,
    api: Arc<FeedbackApi>,
    query: PagedQuery<Feedback, ReplyFilter>,
    drafts: Mutex<HashMap<i64, String>>,
}

impl FeedbackView {
    pub fn new(client: Arc<AdminClient>, page_size: u32) -> Self {
        let api = Arc::new(FeedbackApi::new(client.clone()));
        let fetcher: Arc<dyn PageFetcher<Feedback, ReplyFilter>> = api.clone();
        let query = PagedQuery::new("Feedback", fetcher, page_size, ReplyFilter::All);
        Self {
            client,
            api,
            query,
            drafts: Mutex::new(HashMap::new()),
        }
    }

    pub fn query(&self) -> &PagedQuery<Feedback, ReplyFilter> {
        &self.query
    }

    pub fn feedbacks(&self) -> Vec<Feedback> {
        self.query.items()
    }

    pub async fn load(&self) -> AdminResult<LoadOutcome> {
        let outcome = self.query.refresh().await?;
        self.reset_drafts(outcome);
        Ok(outcome)
    }

    pub async fn set_page(&self, page: u32) -> AdminResult<LoadOutcome> {
        let outcome = self.query.set_page(page).await?;
        self.reset_drafts(outcome);
        Ok(outcome)
    }

    pub async fn open_at(&self, page: u32) -> AdminResult<LoadOutcome> {
        let outcome = self.query.open_at(page).await?;
        self.reset_drafts(outcome);
        Ok(outcome)
    }

    pub async fn set_filter(&self, filter: ReplyFilter) -> AdminResult<LoadOutcome> {
        let outcome = self.query.set_filter(filter).await?;
        self.reset_drafts(outcome);
        Ok(outcome)
    }

    fn reset_drafts(&self, outcome: LoadOutcome) {
        if outcome != LoadOutcome::Applied {
            return;
        }
        let drafts = self
            .query
            .items()
            .iter()
            .map(|f| (f.feedback_no, f.trimmed_reply()))
            .collect();
        *self.drafts.lock() = drafts;
    }

    pub fn reply_draft(&self, feedback_no: i64) -> Option<String> {
        self.drafts.lock().get(&feedback_no).cloned()
    }

    pub fn set_reply_draft(&self, feedback_no: i64, content: impl Into<String>) {
        self.drafts.lock().insert(feedback_no, content.into());
    }

    /// 提交草稿中的回复，成功后刷新当前页；空草稿照常提交，用于清空已有回复
    pub async fn submit_reply(&self, feedback_no: i64) -> AdminResult<()> {
        let content = self.reply_draft(feedback_no).unwrap_or_default();
        if let Err(e) = self.api.submit_reply(feedback_no, &content).await {
            error!("[FeedbackView] 回复提交失败，保留草稿 {}: {}", feedback_no, e);
            return Err(e);
        }
        info!("[FeedbackView] ✅ 反馈 {} 已回复", feedback_no);
        self.load().await?;
        Ok(())
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(
            &[
                "번호", "제목", "내용", "카테고리", "생성일", "수정일", "닉네임", "답변", "작업",
            ],
            "피드백이 없습니다.",
        );
        let drafts = self.drafts.lock().clone();
        for f in self.query.items() {
            let draft = drafts
                .get(&f.feedback_no)
                .cloned()
                .unwrap_or_else(|| f.trimmed_reply());
            table.push_row(vec![
                f.feedback_no.to_string(),
                f.title.clone(),
                f.content.clone(),
                f.category.clone(),
                format_timestamp(&f.create_date),
                format_timestamp(&f.update_date),
                f.nickname.clone(),
                draft,
                f.reply_action_label().to_string(),
            ]);
        }
        table
    }
}
