use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error};

use crate::admin::error::{AdminError, AdminResult};

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 主键可能是数字也可能是字符串，统一转为字符串
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

/// 统一的 API 响应信封（timeStamp、status、message、data）
/// data 字段可能为 null 或缺失，因此使用 Option<T>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResult<T> {
    #[serde(default)]
    pub time_stamp: String,
    #[serde(default)]
    pub status: serde_json::Value,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResult<T> {
    /// 取出 data，缺失时视为解析失败
    pub fn into_data(self, operation_name: &str) -> AdminResult<T> {
        self.data
            .ok_or_else(|| AdminError::Decode(format!("{}响应中缺少 data 字段", operation_name)))
    }
}

fn first_page() -> u32 {
    1
}

/// 服务器分页负载：`{content, currentPage, totalPages}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct PageResponse<T> {
    #[serde(default = "Vec::new", deserialize_with = "deserialize_vec_or_null")]
    pub content: Vec<T>,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub total_pages: u32,
}

/// 客户端使用的分页结果
///
/// 不变量：`1 <= current_page <= total_pages`
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, current_page: u32, total_pages: u32) -> Self {
        let total_pages = total_pages.max(1);
        Self {
            items,
            current_page: current_page.clamp(1, total_pages),
            total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

impl<T> From<PageResponse<T>> for Page<T> {
    fn from(resp: PageResponse<T>) -> Self {
        // totalPages 以服务器为准，仅做下限保护
        Page::new(resp.content, resp.current_page, resp.total_pages)
    }
}

/// 把响应 body 解析为统一信封
pub fn decode_envelope<T: serde::de::DeserializeOwned>(
    body: &[u8],
    operation_name: &str,
) -> AdminResult<ApiResult<T>> {
    let body_str = String::from_utf8_lossy(body);
    debug!("[HTTP] {}响应 Body: {}", operation_name, body_str);

    serde_json::from_slice::<ApiResult<T>>(body).map_err(|e| {
        error!(
            "[HTTP] {}反序列化失败: {:?}\n原始响应: {}",
            operation_name, e, body_str
        );
        AdminError::Decode(format!("{}: {}", operation_name, e))
    })
}
