//! 会员管理页

use crate::admin::client::AdminClient;
use crate::admin::error::{AdminError, AdminResult};
use crate::admin::member::api::MemberApi;
use crate::admin::member::types::{Member, MemberFilter, MemberTab};
use crate::admin::pagination::{LoadOutcome, PageFetcher, PagedQuery};
use crate::admin::render::Table;
use std::sync::Arc;
use tracing::{info, warn};

pub struct MemberView {
    client: Arc<AdminClient>,
    api: Arc<MemberApi>,
    query: PagedQuery<Member, MemberFilter>,
}

impl MemberView {
    pub fn new(client: Arc<AdminClient>, page_size: u32) -> Self {
        let api = Arc::new(MemberApi::new(client.clone()));
        let fetcher: Arc<dyn PageFetcher<Member, MemberFilter>> = api.clone();
        let query = PagedQuery::new("Member", fetcher, page_size, MemberFilter::default());
        Self { client, api, query }
    }

    pub fn query(&self) -> &PagedQuery<Member, MemberFilter> {
        &self.query
    }

    pub fn members(&self) -> Vec<Member> {
        self.query.items()
    }

    pub async fn load(&self) -> AdminResult<LoadOutcome> {
        self.query.refresh().await
    }

    pub async fn set_page(&self, page: u32) -> AdminResult<LoadOutcome> {
        self.query.set_page(page).await
    }

    /// 切换标签（保留搜索关键字），回到第一页
    pub async fn set_tab(&self, tab: MemberTab) -> AdminResult<LoadOutcome> {
        let mut filter = self.query.filter();
        filter.tab = tab;
        self.query.set_filter(filter).await
    }

    /// 按昵称或姓名搜索，回到第一页
    pub async fn search(&self, keyword: &str) -> AdminResult<LoadOutcome> {
        let mut filter = self.query.filter();
        filter.keyword = keyword.to_string();
        self.query.set_filter(filter).await
    }

    /// 切换黑名单状态，返回新的状态
    ///
    /// 先乐观更新当前列表，请求失败时回滚并把错误交给提示接口
    pub async fn toggle_blacklist(&self, member_id: &str) -> AdminResult<bool> {
        let previous = self.query.update_items(|items| {
            items.iter_mut().find(|m| m.id == member_id).map(|m| {
                let previous = m.is_blacklisted;
                m.is_blacklisted = !previous;
                previous
            })
        });

        let Some(previous) = previous else {
            let err = AdminError::validation(format!("当前页没有会员 {}", member_id));
            self.client.report("设置黑名单", &err).await;
            return Err(err);
        };

        match self.api.set_blacklisted(member_id, !previous).await {
            Ok(()) => {
                info!("[MemberView] 会员 {} 黑名单: {}", member_id, !previous);
                Ok(!previous)
            }
            Err(e) => {
                warn!("[MemberView] 黑名单切换失败，回滚会员 {}: {}", member_id, e);
                self.query.update_items(|items| {
                    if let Some(m) = items.iter_mut().find(|m| m.id == member_id) {
                        m.is_blacklisted = previous;
                    }
                });
                Err(e)
            }
        }
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(
            &["ID", "닉네임", "레벨", "이름", "신고 횟수", "상태", "블랙리스트", "작업"],
            "회원이 없습니다.",
        );
        for m in self.query.items() {
            table.push_row(vec![
                m.id.clone(),
                m.nickname.clone(),
                m.level.to_string(),
                m.name.clone(),
                m.report_cnt.to_string(),
                m.active_label().to_string(),
                m.blacklist_label().to_string(),
                m.toggle_action_label().to_string(),
            ]);
        }
        table
    }
}
