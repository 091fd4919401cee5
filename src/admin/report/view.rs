//! 举报审核页
//!
//! 两个标签各自维护分页状态；打开某条举报时并行加载详情和同一对象的全部举报，
//! 管理员在相关举报中勾选若干条后统一处理。

use crate::admin::client::AdminClient;
use crate::admin::error::{AdminError, AdminResult};
use crate::admin::pagination::{LoadOutcome, PageFetcher, PagedQuery, RequestSequencer};
use crate::admin::render::Table;
use crate::admin::report::api::ReportApi;
use crate::admin::report::types::{
    report_status_label, ReportDetail, ReportKind, ReportRow, ReportStatus,
};
use futures_util::future::join_all;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

/// 详情面板
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDetailPane {
    pub detail: ReportDetail,
    pub related: Vec<ReportRow>,
    pub selected: BTreeSet<i64>,
}

pub struct ReportView {
    client: Arc<AdminClient>,
    api: Arc<ReportApi>,
    post_reports: PagedQuery<ReportRow, ReportKind>,
    reply_reports: PagedQuery<ReportRow, ReportKind>,
    active: Mutex<ReportKind>,
    pane: Mutex<Option<ReportDetailPane>>,
    pane_sequencer: RequestSequencer,
}

impl ReportView {
    pub fn new(client: Arc<AdminClient>, page_size: u32) -> Self {
        let api = Arc::new(ReportApi::new(client.clone()));
        let fetcher: Arc<dyn PageFetcher<ReportRow, ReportKind>> = api.clone();
        Self {
            post_reports: PagedQuery::new("PostReport", fetcher.clone(), page_size, ReportKind::Post),
            reply_reports: PagedQuery::new("ReplyReport", fetcher, page_size, ReportKind::Reply),
            client,
            api,
            active: Mutex::new(ReportKind::Post),
            pane: Mutex::new(None),
            pane_sequencer: RequestSequencer::new(),
        }
    }

    pub fn active_tab(&self) -> ReportKind {
        *self.active.lock()
    }

    pub fn query(&self, kind: ReportKind) -> &PagedQuery<ReportRow, ReportKind> {
        match kind {
            ReportKind::Post => &self.post_reports,
            ReportKind::Reply => &self.reply_reports,
        }
    }

    pub fn active_query(&self) -> &PagedQuery<ReportRow, ReportKind> {
        self.query(self.active_tab())
    }

    pub async fn load(&self) -> AdminResult<LoadOutcome> {
        self.active_query().refresh().await
    }

    /// 切换标签并重新拉取该标签的当前页，同时关闭详情
    pub async fn set_tab(&self, kind: ReportKind) -> AdminResult<LoadOutcome> {
        *self.active.lock() = kind;
        self.close_detail();
        self.query(kind).refresh().await
    }

    pub async fn set_page(&self, page: u32) -> AdminResult<LoadOutcome> {
        self.active_query().set_page(page).await
    }

    /// 切换到某个标签并直接打开指定页
    pub async fn open_tab(&self, kind: ReportKind, page: u32) -> AdminResult<LoadOutcome> {
        *self.active.lock() = kind;
        self.close_detail();
        self.query(kind).open_at(page).await
    }

    pub fn detail_pane(&self) -> Option<ReportDetailPane> {
        self.pane.lock().clone()
    }

    /// 打开当前标签中某条举报的详情
    pub async fn open_detail(&self, report_no: i64) -> AdminResult<ReportDetailPane> {
        let kind = self.active_tab();
        let row = self
            .active_query()
            .items()
            .into_iter()
            .find(|r| r.report_no() == report_no);
        let Some(row) = row else {
            let err = AdminError::validation(format!("当前页没有举报 {}", report_no));
            self.client.report("获取举报详情", &err).await;
            return Err(err);
        };
        self.load_pane(kind, report_no, row.target_no()).await
    }

    /// 不经过列表直接打开详情（CLI 用），相关举报按详情中的对象编号加载
    pub async fn open_detail_direct(
        &self,
        kind: ReportKind,
        report_no: i64,
    ) -> AdminResult<ReportDetailPane> {
        *self.active.lock() = kind;
        let seq = self.pane_sequencer.issue();
        let detail = self.api.get_detail(kind, report_no).await?;
        let related = self.related_or_empty(kind, detail.target_no()).await;
        self.apply_pane(seq, detail, related)
    }

    async fn load_pane(
        &self,
        kind: ReportKind,
        report_no: i64,
        target_no: &str,
    ) -> AdminResult<ReportDetailPane> {
        let seq = self.pane_sequencer.issue();
        let (detail, related) = tokio::join!(
            self.api.get_detail(kind, report_no),
            self.related_or_empty(kind, target_no)
        );
        self.apply_pane(seq, detail?, related)
    }

    async fn related_or_empty(&self, kind: ReportKind, target_no: &str) -> Vec<ReportRow> {
        match self.api.list_related(kind, target_no).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("[ReportView] 相关举报加载失败，对象 {}: {}", target_no, e);
                Vec::new()
            }
        }
    }

    fn apply_pane(
        &self,
        seq: u64,
        detail: ReportDetail,
        related: Vec<ReportRow>,
    ) -> AdminResult<ReportDetailPane> {
        let pane = ReportDetailPane {
            detail,
            related,
            selected: BTreeSet::new(),
        };
        if self.pane_sequencer.is_latest(seq) {
            *self.pane.lock() = Some(pane.clone());
        }
        Ok(pane)
    }

    /// 勾选 / 取消勾选一条相关举报，返回勾选后的状态
    pub fn toggle_row(&self, report_no: i64) -> AdminResult<bool> {
        let mut pane = self.pane.lock();
        let Some(pane) = pane.as_mut() else {
            return Err(AdminError::validation("未打开举报详情"));
        };
        if !pane.related.iter().any(|r| r.report_no() == report_no) {
            return Err(AdminError::validation(format!(
                "举报 {} 不在相关举报中",
                report_no
            )));
        }
        if pane.selected.remove(&report_no) {
            Ok(false)
        } else {
            pane.selected.insert(report_no);
            Ok(true)
        }
    }

    pub fn close_detail(&self) {
        self.pane_sequencer.issue();
        *self.pane.lock() = None;
    }

    /// 处理已勾选的举报，之后刷新相关举报和当前列表
    ///
    /// 各条请求并发提交；失败的条目保持勾选，返回第一个错误
    pub async fn resolve_selected(&self, status: ReportStatus) -> AdminResult<usize> {
        let (kind, selected, target_no) = {
            let pane = self.pane.lock();
            let Some(pane) = pane.as_ref() else {
                return Err(AdminError::validation("未打开举报详情"));
            };
            (
                pane.detail.kind(),
                pane.selected.iter().copied().collect::<Vec<_>>(),
                pane.detail.target_no().to_string(),
            )
        };
        if selected.is_empty() {
            let err = AdminError::validation("没有勾选任何举报");
            self.client.report("处理举报", &err).await;
            return Err(err);
        }

        let results = join_all(
            selected
                .iter()
                .map(|report_no| self.api.resolve(kind, *report_no, status)),
        )
        .await;

        let mut resolved = 0;
        let mut first_err = None;
        {
            let mut pane = self.pane.lock();
            for (report_no, result) in selected.iter().zip(results) {
                match result {
                    Ok(()) => {
                        resolved += 1;
                        if let Some(pane) = pane.as_mut() {
                            pane.selected.remove(report_no);
                        }
                    }
                    Err(e) => {
                        warn!("[ReportView] 举报 {} 处理失败: {}", report_no, e);
                        first_err.get_or_insert(e);
                    }
                }
            }
        }
        info!(
            "[ReportView] 已处理 {}/{} 条举报 -> {}",
            resolved,
            selected.len(),
            status.label()
        );

        if resolved > 0 {
            let related = self.related_or_empty(kind, &target_no).await;
            if let Some(pane) = self.pane.lock().as_mut() {
                pane.related = related;
            }
            if let Err(e) = self.query(kind).refresh().await {
                if first_err.is_none() {
                    return Err(e);
                }
                // 部分失败时以提交错误为准
                warn!("[ReportView] 处理后刷新列表失败: {}", e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(resolved),
        }
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(
            &["번호", "내용", "카테고리", "신고자 번호", "게시글/댓글 번호", "진행상황"],
            "신고가 없습니다.",
        );
        for row in self.active_query().items() {
            table.push_row(report_cells(&row));
        }
        table
    }

    /// 详情面板中的相关举报表，第一列是勾选标记
    pub fn related_table(&self) -> Option<Table> {
        let pane = self.detail_pane()?;
        let mut table = Table::new(
            &["선택", "번호", "내용", "카테고리", "신고자 번호", "진행상황"],
            "신고가 없습니다.",
        );
        for row in &pane.related {
            let mark = if pane.selected.contains(&row.report_no()) {
                "[x]"
            } else {
                "[ ]"
            };
            table.push_row(vec![
                mark.to_string(),
                row.report_no().to_string(),
                row.content().to_string(),
                row.category().to_string(),
                row.reporter_no().to_string(),
                report_status_label(row.status()),
            ]);
        }
        Some(table)
    }
}

fn report_cells(row: &ReportRow) -> Vec<String> {
    vec![
        row.report_no().to_string(),
        row.content().to_string(),
        row.category().to_string(),
        row.reporter_no().to_string(),
        row.target_no().to_string(),
        report_status_label(row.status()),
    ]
}
