//! FAQ HTTP API 客户端

use crate::admin::client::{AdminClient, RequestOptions};
use crate::admin::error::AdminResult;
use crate::admin::faq::types::{Faq, FaqDraft};
use std::sync::Arc;
use tracing::info;

const FAQ_PATH: &str = "/api/v1/faq";

pub struct FaqApi {
    client: Arc<AdminClient>,
}

impl FaqApi {
    pub fn new(client: Arc<AdminClient>) -> Self {
        Self { client }
    }

    /// 获取全部 FAQ（不分页）
    pub async fn list_faqs(&self) -> AdminResult<Vec<Faq>> {
        let faqs: Vec<Faq> = self
            .client
            .fetch_data("获取FAQ列表", FAQ_PATH, RequestOptions::get())
            .await?;
        info!("[FaqAPI] ✅ FAQ 数: {}", faqs.len());
        Ok(faqs)
    }

    pub async fn get_faq(&self, faq_no: i64) -> AdminResult<Faq> {
        let path = format!("{}/{}", FAQ_PATH, faq_no);
        self.client
            .fetch_data("获取FAQ", &path, RequestOptions::get())
            .await
    }

    pub async fn create_faq(&self, draft: &FaqDraft) -> AdminResult<()> {
        let options = RequestOptions::post().json(draft)?;
        self.client.execute("新建FAQ", FAQ_PATH, options).await?;
        info!("[FaqAPI] ✅ 已新建 FAQ");
        Ok(())
    }

    pub async fn update_faq(&self, faq_no: i64, draft: &FaqDraft) -> AdminResult<()> {
        let path = format!("{}/{}", FAQ_PATH, faq_no);
        let options = RequestOptions::put().json(draft)?;
        self.client.execute("修改FAQ", &path, options).await?;
        info!("[FaqAPI] ✅ 已修改 FAQ {}", faq_no);
        Ok(())
    }

    pub async fn delete_faq(&self, faq_no: i64) -> AdminResult<()> {
        let path = format!("{}/{}", FAQ_PATH, faq_no);
        self.client
            .execute("删除FAQ", &path, RequestOptions::delete())
            .await?;
        info!("[FaqAPI] ✅ 已删除 FAQ {}", faq_no);
        Ok(())
    }
}
