//! 反馈 HTTP API 客户端

use crate::admin::client::{AdminClient, RequestOptions};
use crate::admin::error::AdminResult;
use crate::admin::feedback::types::{Feedback, ReplyFilter, ReplyRequest};
use crate::admin::pagination::PageFetcher;
use crate::admin::types::{Page, PageResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct FeedbackApi {
    client: Arc<AdminClient>,
}

impl FeedbackApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    /// 分页获取反馈
    pub async fn list_feedbacks(
        &self,
        page: u32,
        size: u32,
        filter: ReplyFilter,
    ) -> AdminResult<Page<Feedback>> {
        let mut options = RequestOptions::get().query("page", page).query("size", size);
        if let Some(has_reply) = filter.has_reply() {
            options = options.query("hasReply", has_reply);
        }
        let resp: PageResponse<Feedback> = self
            .client
            .fetch_data("获取反馈列表", "/api/v1/feedbacks/admin", options)
            .await?;
        info!("[FeedbackAPI] ✅ 反馈列表，条目数: {}", resp.content.len());
        Ok(resp.into())
    }

    /// 提交或修改回复
    pub async fn submit_reply(&self, feedback_no: i64, content: &str) -> AdminResult<()> {
        let path = format!("/api/v1/feedbacks/admin/{}", feedback_no);
        let options = RequestOptions::put().json(&ReplyRequest {
            content: content.to_string(),
        })?;
        self.client.execute("提交反馈回复", &path, options).await?;
        info!("[FeedbackAPI] ✅ 已回复反馈 {}", feedback_no);
        Ok(())
    }
}

#[async_trait]
impl PageFetcher<Feedback, ReplyFilter> for FeedbackApi {
    async fn fetch_page(
        &self,
        page: u32,
        size: u32,
        filter: &ReplyFilter,
    ) -> AdminResult<Page<Feedback>> {
        self.list_feedbacks(page, size, *filter).await
    }
}
