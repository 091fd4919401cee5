//! 挑战管理页

use crate::admin::challenge::api::ChallengeApi;
use crate::admin::challenge::types::{
    challenge_category_label, challenge_status_label, Challenge, ChallengeStatus, NewChallenge,
};
use crate::admin::client::AdminClient;
use crate::admin::error::{AdminError, AdminResult};
use crate::admin::pagination::{LoadOutcome, RequestSequencer};
use crate::admin::render::Table;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Default)]
struct ChallengeState {
    status: ChallengeStatus,
    challenges: Vec<Challenge>,
    count: i64,
    selected: Option<Challenge>,
    /// 尚未成功提交的新建表单
    draft: Option<NewChallenge>,
}

pub struct ChallengeView {
    client: Arc<AdminClient>,
    api: ChallengeApi,
    sequencer: RequestSequencer,
    state: Mutex<ChallengeState>,
}

impl ChallengeView {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self {
            api: ChallengeApi::new(client.clone()),
            client,
            sequencer: RequestSequencer::new(),
            state: Mutex::new(ChallengeState::default()),
        }
    }

    pub fn status(&self) -> ChallengeStatus {
        self.state.lock().status
    }

    pub fn challenges(&self) -> Vec<Challenge> {
        self.state.lock().challenges.clone()
    }

    /// 服务器返回的总数
    pub fn count(&self) -> i64 {
        self.state.lock().count
    }

    pub fn selected(&self) -> Option<Challenge> {
        self.state.lock().selected.clone()
    }

    pub fn draft(&self) -> Option<NewChallenge> {
        self.state.lock().draft.clone()
    }

    /// 重新拉取当前状态下的挑战；失败时保留旧列表
    pub async fn load(&self) -> AdminResult<LoadOutcome> {
        let status = self.status();
        let seq = self.sequencer.issue();
        let result = self.api.list_by_status(status).await;
        if !self.sequencer.is_latest(seq) {
            debug!("[ChallengeView] 丢弃过期响应，状态 {}", status.code());
            return Ok(LoadOutcome::Superseded);
        }
        let list = result?;
        let mut state = self.state.lock();
        state.challenges = list.challenge_list;
        state.count = list.challenge_count;
        Ok(LoadOutcome::Applied)
    }

    pub async fn set_status(&self, status: ChallengeStatus) -> AdminResult<LoadOutcome> {
        {
            let mut state = self.state.lock();
            state.status = status;
            state.selected = None;
        }
        self.load().await
    }

    /// 选中一条挑战查看详情
    pub fn select(&self, challenge_no: i64) -> AdminResult<Challenge> {
        let mut state = self.state.lock();
        let found = state
            .challenges
            .iter()
            .find(|c| c.challenge_no == challenge_no)
            .cloned();
        match found {
            Some(c) => {
                state.selected = Some(c.clone());
                Ok(c)
            }
            None => Err(AdminError::validation(format!(
                "当前列表没有挑战 {}",
                challenge_no
            ))),
        }
    }

    /// 新建挑战，成功后清空草稿并刷新列表；失败时草稿保留
    pub async fn create(&self, draft: NewChallenge) -> AdminResult<()> {
        self.state.lock().draft = Some(draft.clone());
        if let Err(e) = draft.validate() {
            self.client.report("新建挑战", &e).await;
            return Err(e);
        }
        if let Err(e) = self.api.create(&draft).await {
            error!("[ChallengeView] 新建挑战失败: {}", e);
            return Err(e);
        }
        self.state.lock().draft = None;
        self.load().await?;
        Ok(())
    }

    /// 用保留的草稿再次提交
    pub async fn retry_create(&self) -> AdminResult<()> {
        let Some(draft) = self.draft() else {
            return Err(AdminError::validation("没有待提交的挑战"));
        };
        self.create(draft).await
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(
            &["번호", "제목", "카테고리", "시작일", "종료일", "상태"],
            "챌린지가 없습니다.",
        );
        for c in self.challenges() {
            table.push_row(vec![
                c.challenge_no.to_string(),
                c.title.clone(),
                challenge_category_label(&c.category),
                c.start_date.clone(),
                c.end_date.clone(),
                challenge_status_label(&c.status),
            ]);
        }
        table
    }
}
