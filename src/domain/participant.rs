use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// 在线参与者 / Active participant
///
/// `name` 在所有在线参与者中唯一（区分大小写，已去除首尾空白）
/// `name` is unique among active participants (case-sensitive, trimmed)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    /// 最近一次心跳或注册时间（毫秒时间戳）
    /// Epoch millis of the last heartbeat or the registration
    #[serde(rename = "lastStatus")]
    pub last_status: i64,
}

impl Participant {
    pub fn new(name: impl Into<String>, last_status: i64) -> Self {
        Self {
            name: name.into(),
            last_status,
        }
    }

    /// 在 `now` 时刻是否已超过 `threshold_ms` 未活跃
    pub fn is_stale(&self, now: i64, threshold_ms: i64) -> bool {
        now.saturating_sub(self.last_status) >= threshold_ms
    }
}

/// 校验并规范化参与者名称 / Validate and normalize a participant name
pub fn normalize_name(raw: Option<&str>) -> AppResult<String> {
    let name = raw
        .map(str::trim)
        .ok_or_else(|| AppError::validation("name", "is required"))?;
    if name.is_empty() {
        return Err(AppError::validation("name", "must not be empty"));
    }
    Ok(name.to_string())
}
