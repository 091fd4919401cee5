//! FAQ 管理页
//!
//! 同一时间最多一行处于编辑状态；编辑内容保存在草稿里，保存成功后刷新列表，
//! 失败时草稿和编辑状态都保留。

use crate::admin::client::AdminClient;
use crate::admin::error::{AdminError, AdminResult};
use crate::admin::faq::api::FaqApi;
use crate::admin::faq::types::{Faq, FaqDraft};
use crate::admin::pagination::{LoadOutcome, RequestSequencer};
use crate::admin::render::Table;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Default)]
struct FaqState {
    faqs: Vec<Faq>,
    editing: Option<(i64, FaqDraft)>,
}

pub struct FaqView {
    client: Arc<AdminClient>,
    api: FaqApi,
    sequencer: RequestSequencer,
    state: Mutex<FaqState>,
}

impl FaqView {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self {
            api: FaqApi::new(client.clone()),
            client,
            sequencer: RequestSequencer::new(),
            state: Mutex::new(FaqState::default()),
        }
    }

    pub fn faqs(&self) -> Vec<Faq> {
        self.state.lock().faqs.clone()
    }

    /// 正在编辑的行号和草稿
    pub fn editing(&self) -> Option<(i64, FaqDraft)> {
        self.state.lock().editing.clone()
    }

    pub async fn load(&self) -> AdminResult<LoadOutcome> {
        let seq = self.sequencer.issue();
        let result = self.api.list_faqs().await;
        if !self.sequencer.is_latest(seq) {
            debug!("[FaqView] 丢弃过期响应，序号 {}", seq);
            return Ok(LoadOutcome::Superseded);
        }
        self.state.lock().faqs = result?;
        Ok(LoadOutcome::Applied)
    }

    /// 进入编辑状态，草稿取当前内容
    pub fn begin_edit(&self, faq_no: i64) -> AdminResult<FaqDraft> {
        let mut state = self.state.lock();
        let draft = state
            .faqs
            .iter()
            .find(|f| f.faq_no == faq_no)
            .map(FaqDraft::from)
            .ok_or_else(|| AdminError::validation(format!("没有 FAQ {}", faq_no)))?;
        state.editing = Some((faq_no, draft.clone()));
        Ok(draft)
    }

    pub fn edit_question(&self, question: impl Into<String>) -> AdminResult<()> {
        self.with_draft(|d| d.question = question.into())
    }

    pub fn edit_answer(&self, answer: impl Into<String>) -> AdminResult<()> {
        self.with_draft(|d| d.answer = answer.into())
    }

    fn with_draft(&self, f: impl FnOnce(&mut FaqDraft)) -> AdminResult<()> {
        match self.state.lock().editing.as_mut() {
            Some((_, draft)) => {
                f(draft);
                Ok(())
            }
            None => Err(AdminError::validation("没有正在编辑的 FAQ")),
        }
    }

    pub fn cancel_edit(&self) {
        self.state.lock().editing = None;
    }

    /// 保存编辑，成功后退出编辑并刷新
    pub async fn save_edit(&self) -> AdminResult<()> {
        let Some((faq_no, draft)) = self.editing() else {
            return Err(AdminError::validation("没有正在编辑的 FAQ"));
        };
        if let Err(e) = draft.validate() {
            self.client.report("修改FAQ", &e).await;
            return Err(e);
        }
        if let Err(e) = self.api.update_faq(faq_no, &draft).await {
            error!("[FaqView] 修改 FAQ {} 失败，保留草稿: {}", faq_no, e);
            return Err(e);
        }
        {
            let mut state = self.state.lock();
            if matches!(state.editing, Some((no, _)) if no == faq_no) {
                state.editing = None;
            }
        }
        self.load().await?;
        Ok(())
    }

    pub async fn create(&self, draft: FaqDraft) -> AdminResult<()> {
        if let Err(e) = draft.validate() {
            self.client.report("新建FAQ", &e).await;
            return Err(e);
        }
        self.api.create_faq(&draft).await?;
        self.load().await?;
        Ok(())
    }

    pub async fn delete(&self, faq_no: i64) -> AdminResult<()> {
        self.api.delete_faq(faq_no).await?;
        {
            let mut state = self.state.lock();
            if matches!(state.editing, Some((no, _)) if no == faq_no) {
                state.editing = None;
            }
        }
        self.load().await?;
        Ok(())
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(&["번호", "질문", "답변", "작업"], "FAQ가 없습니다.");
        let state = self.state.lock();
        for faq in &state.faqs {
            let row = match &state.editing {
                Some((no, draft)) if *no == faq.faq_no => vec![
                    faq.faq_no.to_string(),
                    draft.question.clone(),
                    draft.answer.clone(),
                    "저장 | 취소".to_string(),
                ],
                _ => vec![
                    faq.faq_no.to_string(),
                    faq.question.clone(),
                    faq.answer.clone(),
                    "수정 | 삭제".to_string(),
                ],
            };
            table.push_row(row);
        }
        table
    }
}
