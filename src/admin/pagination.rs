//! 通用分页查询控制器
//!
//! 所有分页列表页共用 [`PagedQuery`]：持有当前页、总页数和过滤条件，
//! 向后台请求一页数据，并提供上一页 / 下一页 / 跳页操作。
//!
//! 每次请求都会领取一个递增的序号，响应返回时若已有更新的请求发出，
//! 则直接丢弃，避免慢请求覆盖新数据。

use crate::admin::error::{AdminError, AdminResult};
use crate::admin::types::Page;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info};

/// 最多展示的页码按钮数
pub const MAX_PAGE_BUTTONS: u32 = 5;

/// 分页数据源（每个列表页实现一个）
#[async_trait]
pub trait PageFetcher<T, F>: Send + Sync {
    async fn fetch_page(&self, page: u32, size: u32, filter: &F) -> AdminResult<Page<T>>;
}

/// 请求序号发放器：只有最新一次请求的响应允许写入状态
#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 领取新的请求序号
    pub fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == seq
    }
}

/// 加载状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

/// 一次加载的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 响应已写入状态
    Applied,
    /// 期间有更新的请求，响应被丢弃
    Superseded,
    /// 已在边界，未发出请求
    Unchanged,
}

/// 分页按钮
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageButton {
    Page { number: u32, active: bool },
    Ellipsis,
}

/// 分页控件模型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub buttons: Vec<PageButton>,
}

impl PageControls {
    /// 以当前页为中心计算页码窗口
    pub fn window(current_page: u32, total_pages: u32) -> Self {
        let total = total_pages.max(1);
        let current = current_page.clamp(1, total);
        let half = MAX_PAGE_BUTTONS / 2;
        let start = current.saturating_sub(half).max(1);
        let end = current.saturating_add(half).min(total);

        let mut buttons = Vec::new();
        if start > 1 {
            buttons.push(PageButton::Page {
                number: 1,
                active: false,
            });
            if start > 2 {
                buttons.push(PageButton::Ellipsis);
            }
        }
        for number in start..=end {
            buttons.push(PageButton::Page {
                number,
                active: number == current,
            });
        }
        if end < total {
            if end.saturating_add(1) < total {
                buttons.push(PageButton::Ellipsis);
            }
            buttons.push(PageButton::Page {
                number: total,
                active: false,
            });
        }

        Self {
            prev_enabled: current > 1,
            next_enabled: current < total,
            buttons,
        }
    }

    /// 文本形式，例如 `이전 1 ... 4 [5] 6 ... 9 다음`，禁用的方向显示为 `-`
    pub fn to_text(&self) -> String {
        let mut parts = Vec::new();
        parts.push(if self.prev_enabled { "이전" } else { "-" }.to_string());
        for b in &self.buttons {
            parts.push(match b {
                PageButton::Page { number, active: true } => format!("[{}]", number),
                PageButton::Page { number, .. } => number.to_string(),
                PageButton::Ellipsis => "...".to_string(),
            });
        }
        parts.push(if self.next_enabled { "다음" } else { "-" }.to_string());
        parts.join(" ")
    }
}

struct Inner<T, F> {
    items: Vec<T>,
    current_page: u32,
    total_pages: u32,
    filter: F,
    state: LoadState,
}

/// 通用分页查询控制器
pub struct PagedQuery<T, F> {
    name: String,
    fetcher: Arc<dyn PageFetcher<T, F>>,
    page_size: u32,
    sequencer: RequestSequencer,
    inner: Mutex<Inner<T, F>>,
}

impl<T, F> PagedQuery<T, F>
where
    T: Clone + Send + Sync,
    F: Clone + Send + Sync,
{
    pub fn new(
        name: impl Into<String>,
        fetcher: Arc<dyn PageFetcher<T, F>>,
        page_size: u32,
        filter: F,
    ) -> Self {
        Self {
            name: name.into(),
            fetcher,
            page_size: page_size.max(1),
            sequencer: RequestSequencer::new(),
            inner: Mutex::new(Inner {
                items: Vec::new(),
                current_page: 1,
                total_pages: 1,
                filter,
                state: LoadState::Idle,
            }),
        }
    }

    pub fn items(&self) -> Vec<T> {
        self.inner.lock().items.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.inner.lock().current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.inner.lock().total_pages
    }

    pub fn filter(&self) -> F {
        self.inner.lock().filter.clone()
    }

    pub fn state(&self) -> LoadState {
        self.inner.lock().state.clone()
    }

    pub fn controls(&self) -> PageControls {
        let inner = self.inner.lock();
        PageControls::window(inner.current_page, inner.total_pages)
    }

    /// 直接修改当前列表（仅供乐观更新使用）
    pub fn update_items<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        f(&mut self.inner.lock().items)
    }

    /// 按当前页和过滤条件重新加载
    pub async fn refresh(&self) -> AdminResult<LoadOutcome> {
        let (page, filter) = {
            let inner = self.inner.lock();
            (inner.current_page, inner.filter.clone())
        };
        self.load(page, filter).await
    }

    /// 跳到指定页，只接受 `1..=total_pages`
    pub async fn set_page(&self, page: u32) -> AdminResult<LoadOutcome> {
        let (total, filter) = {
            let inner = self.inner.lock();
            (inner.total_pages, inner.filter.clone())
        };
        if page < 1 || page > total {
            return Err(AdminError::validation(format!(
                "页码超出范围: {}（共 {} 页）",
                page, total
            )));
        }
        self.load(page, filter).await
    }

    /// 跳页，越界时收敛到最近的有效页
    pub async fn jump_to(&self, page: u32) -> AdminResult<LoadOutcome> {
        let total = self.total_pages();
        self.set_page(page.clamp(1, total)).await
    }

    /// 首次进入时直接打开某一页（此时总页数未知，不做上限校验）
    pub async fn open_at(&self, page: u32) -> AdminResult<LoadOutcome> {
        let filter = self.filter();
        self.load(page.max(1), filter).await
    }

    /// 同时指定过滤条件和起始页打开
    pub async fn open_with(&self, filter: F, page: u32) -> AdminResult<LoadOutcome> {
        self.inner.lock().filter = filter.clone();
        self.load(page.max(1), filter).await
    }

    pub async fn next_page(&self) -> AdminResult<LoadOutcome> {
        let (current, total) = {
            let inner = self.inner.lock();
            (inner.current_page, inner.total_pages)
        };
        if current >= total {
            return Ok(LoadOutcome::Unchanged);
        }
        self.set_page(current + 1).await
    }

    pub async fn prev_page(&self) -> AdminResult<LoadOutcome> {
        let current = self.current_page();
        if current <= 1 {
            return Ok(LoadOutcome::Unchanged);
        }
        self.set_page(current - 1).await
    }

    /// 更换过滤条件，先回到第一页再请求；失败时恢复原过滤条件和页码
    pub async fn set_filter(&self, filter: F) -> AdminResult<LoadOutcome> {
        let previous = {
            let mut inner = self.inner.lock();
            let previous = (inner.filter.clone(), inner.current_page);
            inner.filter = filter.clone();
            inner.current_page = 1;
            previous
        };
        let result = self.load(1, filter).await;
        if result.is_err() {
            let mut inner = self.inner.lock();
            inner.filter = previous.0;
            inner.current_page = previous.1;
        }
        result
    }

    async fn load(&self, page: u32, filter: F) -> AdminResult<LoadOutcome> {
        let seq = self.sequencer.issue();
        self.inner.lock().state = LoadState::Loading;
        debug!("[PagedQuery/{}] 请求第 {} 页，序号 {}", self.name, page, seq);

        let result = self.fetcher.fetch_page(page, self.page_size, &filter).await;

        if !self.sequencer.is_latest(seq) {
            debug!(
                "[PagedQuery/{}] 丢弃过期响应，页码 {}，序号 {}",
                self.name, page, seq
            );
            return Ok(LoadOutcome::Superseded);
        }

        let mut inner = self.inner.lock();
        match result {
            Ok(fetched) => {
                info!(
                    "[PagedQuery/{}] ✅ 第 {}/{} 页，条目数: {}",
                    self.name,
                    fetched.current_page,
                    fetched.total_pages,
                    fetched.items.len()
                );
                inner.items = fetched.items;
                inner.current_page = fetched.current_page;
                inner.total_pages = fetched.total_pages;
                inner.state = LoadState::Loaded;
                Ok(LoadOutcome::Applied)
            }
            Err(e) => {
                // 保留旧数据
                error!("[PagedQuery/{}] 加载第 {} 页失败: {}", self.name, page, e);
                inner.state = LoadState::Errored(e.to_string());
                Err(e)
            }
        }
    }
}
