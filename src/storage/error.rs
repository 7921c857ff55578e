use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// 存储层错误 / Storage layer error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("存储不可用: {0}")]
    Unavailable(String),
    #[error("SQLx 错误: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("存储操作超时: {operation} ({timeout_ms}ms)")]
    Timeout { operation: String, timeout_ms: u64 },
    #[error("数据损坏: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn unavailable<T: Into<String>>(message: T) -> Self {
        Self::Unavailable(message.into())
    }
}

/// 获取详细错误描述（中英文） / Get detailed error description (CN/EN)
pub fn describe_error(e: &StoreError) -> String {
    match e {
        StoreError::Unavailable(msg) => format!("存储不可用 / Store unavailable: {}", msg),
        StoreError::Sqlx(err) => format!("SQLx 错误 / SQLx error: {}", err),
        StoreError::Timeout {
            operation,
            timeout_ms,
        } => format!(
            "操作超时 / Operation timed out: {} after {}ms",
            operation, timeout_ms
        ),
        StoreError::Corrupt(msg) => format!("数据损坏 / Corrupt record: {}", msg),
    }
}
