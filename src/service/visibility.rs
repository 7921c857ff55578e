use crate::conf::VisibilityConfig;
use crate::domain::Message;
use crate::error::AppResult;
use crate::storage::{Audience, MessageQuery, SharedStore};

/// 解析 `limit` 查询参数 / Parse the `limit` query parameter
///
/// 缺失、非数字、零或负数都视为不限条数，从不报错
/// Missing, non-numeric, zero or negative all mean "no limit"; never an error
pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.map(str::trim)
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
}

/// 消息可见性过滤器 / Message visibility filter
#[derive(Clone)]
pub struct MessageVisibilityFilter {
    store: SharedStore,
    config: VisibilityConfig,
}

impl MessageVisibilityFilter {
    pub fn new(store: SharedStore, config: VisibilityConfig) -> Self {
        Self { store, config }
    }

    /// 请求者可见的消息，按时间从旧到新，仅保留最近 `limit` 条
    /// Messages visible to `requester`, oldest first, trimmed to the most
    /// recent `limit`
    ///
    /// 存储端按新到旧取回并截断，内存中再反转为时间顺序
    /// The store returns newest-first already bounded by `limit`; the page
    /// is reversed here into chronological order
    pub async fn list_visible(
        &self,
        requester: Option<&str>,
        limit: Option<usize>,
    ) -> AppResult<Vec<Message>> {
        let query = MessageQuery {
            audience: Audience::new(
                requester.map(str::to_string),
                self.config.public_type_visible,
            ),
            limit,
        };
        let mut page = self.store.query_messages(&query).await?;
        page.reverse();
        Ok(page)
    }
}
