//! 挑战 HTTP API 客户端

use crate::admin::challenge::types::{ChallengeList, ChallengeStatus, NewChallenge};
use crate::admin::client::{AdminClient, RequestOptions};
use crate::admin::error::AdminResult;
use std::sync::Arc;
use tracing::info;

pub struct ChallengeApi {
    client: Arc<AdminClient>,
}

impl ChallengeApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    /// 按状态获取挑战列表（不分页）
    pub async fn list_by_status(&self, status: ChallengeStatus) -> AdminResult<ChallengeList> {
        let options = RequestOptions::get().query("status", status.code());
        let list: ChallengeList = self
            .client
            .fetch_data("获取挑战列表", "/api/v1/challenges/status", options)
            .await?;
        info!(
            "[ChallengeAPI] ✅ {} 挑战数: {}",
            status.code(),
            list.challenge_list.len()
        );
        Ok(list)
    }

    /// 新建挑战（multipart 上传）
    pub async fn create(&self, draft: &NewChallenge) -> AdminResult<()> {
        let options = RequestOptions::post().multipart(draft.to_form()?);
        self.client
            .execute("新建挑战", "/api/v1/challenges", options)
            .await?;
        info!("[ChallengeAPI] ✅ 已创建挑战: {}", draft.title);
        Ok(())
    }
}
