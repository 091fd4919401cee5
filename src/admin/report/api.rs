//! 举报 HTTP API 客户端

use crate::admin::client::{AdminClient, RequestOptions};
use crate::admin::error::AdminResult;
use crate::admin::pagination::PageFetcher;
use crate::admin::report::types::{
    PostReportDetail, PostReportSummary, ReplyReportDetail, ReplyReportSummary, ReportDetail,
    ReportKind, ReportRow, ReportStatus, ResolveReportRequest,
};
use crate::admin::types::{Page, PageResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub struct ReportApi {
    client: Arc<AdminClient>,
}

impl ReportApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    /// 分页获取举报队列
    pub async fn list_reports(
        &self,
        kind: ReportKind,
        page: u32,
        size: u32,
    ) -> AdminResult<Page<ReportRow>> {
        let options = RequestOptions::get().query("page", page).query("size", size);
        let path = kind.collection_path();
        let page = match kind {
            ReportKind::Post => {
                let resp: PageResponse<PostReportSummary> =
                    self.client.fetch_data("获取帖子举报", path, options).await?;
                Page::from(resp).map(ReportRow::Post)
            }
            ReportKind::Reply => {
                let resp: PageResponse<ReplyReportSummary> =
                    self.client.fetch_data("获取评论举报", path, options).await?;
                Page::from(resp).map(ReportRow::Reply)
            }
        };
        info!(
            "[ReportAPI] ✅ {} 举报列表，条目数: {}",
            kind.label(),
            page.items.len()
        );
        Ok(page)
    }

    /// 举报详情
    pub async fn get_detail(&self, kind: ReportKind, report_no: i64) -> AdminResult<ReportDetail> {
        let path = format!("{}/{}", kind.collection_path(), report_no);
        let options = RequestOptions::get();
        match kind {
            ReportKind::Post => {
                let detail: PostReportDetail =
                    self.client.fetch_data("获取举报详情", &path, options).await?;
                Ok(ReportDetail::Post(detail))
            }
            ReportKind::Reply => {
                let detail: ReplyReportDetail =
                    self.client.fetch_data("获取举报详情", &path, options).await?;
                Ok(ReportDetail::Reply(detail))
            }
        }
    }

    /// 同一帖子 / 评论收到的全部举报
    pub async fn list_related(&self, kind: ReportKind, target_no: &str) -> AdminResult<Vec<ReportRow>> {
        let (path, param) = kind.related_endpoint();
        let options = RequestOptions::get().query(param, target_no);
        let rows = match kind {
            ReportKind::Post => {
                let rows: Vec<PostReportSummary> =
                    self.client.fetch_data("获取相关举报", path, options).await?;
                rows.into_iter().map(ReportRow::Post).collect()
            }
            ReportKind::Reply => {
                let rows: Vec<ReplyReportSummary> =
                    self.client.fetch_data("获取相关举报", path, options).await?;
                rows.into_iter().map(ReportRow::Reply).collect()
            }
        };
        Ok(rows)
    }

    /// 处理举报
    pub async fn resolve(
        &self,
        kind: ReportKind,
        report_no: i64,
        status: ReportStatus,
    ) -> AdminResult<()> {
        let path = format!("{}/{}", kind.collection_path(), report_no);
        let options = RequestOptions::put().json(&ResolveReportRequest {
            status: status.code().to_string(),
        })?;
        self.client.execute("处理举报", &path, options).await?;
        info!(
            "[ReportAPI] ✅ {} 举报 {} -> {}",
            kind.label(),
            report_no,
            status.code()
        );
        Ok(())
    }
}

#[async_trait]
impl PageFetcher<ReportRow, ReportKind> for ReportApi {
    async fn fetch_page(&self, page: u32, size: u32, kind: &ReportKind) -> AdminResult<Page<ReportRow>> {
        self.list_reports(*kind, page, size).await
    }
}
