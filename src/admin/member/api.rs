//! 会员 HTTP API 客户端

use crate::admin::client::{AdminClient, RequestOptions};
use crate::admin::error::AdminResult;
use crate::admin::member::types::{BlacklistRequest, Member, MemberFilter};
use crate::admin::pagination::PageFetcher;
use crate::admin::types::{Page, PageResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

/// 会员相关的 HTTP API 客户端
pub struct MemberApi {
    client: Arc<AdminClient>,
}

impl MemberApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    /// 分页获取会员列表
    pub async fn list_members(
        &self,
        page: u32,
        size: u32,
        filter: &MemberFilter,
    ) -> AdminResult<Page<Member>> {
        let mut options = RequestOptions::get().query("page", page).query("size", size);
        for (k, v) in filter.query_pairs() {
            options = options.query(k, v);
        }
        let resp: PageResponse<Member> = self
            .client
            .fetch_data("获取会员列表", "/api/v1/members", options)
            .await?;
        info!("[MemberAPI] ✅ 会员列表，条目数: {}", resp.content.len());
        Ok(resp.into())
    }

    /// 设置会员黑名单状态
    pub async fn set_blacklisted(&self, member_id: &str, is_blacklisted: bool) -> AdminResult<()> {
        let path = format!("/api/v1/members/{}/blacklist", member_id);
        let options = RequestOptions::post().json(&BlacklistRequest { is_blacklisted })?;
        self.client.execute("设置黑名单", &path, options).await?;
        info!(
            "[MemberAPI] ✅ 会员 {} 黑名单状态: {}",
            member_id, is_blacklisted
        );
        Ok(())
    }
}

#[async_trait]
impl PageFetcher<Member, MemberFilter> for MemberApi {
    async fn fetch_page(
        &self,
        page: u32,
        size: u32,
        filter: &MemberFilter,
    ) -> AdminResult<Page<Member>> {
        self.list_members(page, size, filter).await
    }
}
