//! 存储适配层 / Store adapter
//!
//! 两个集合：参与者与消息。核心逻辑只依赖 [`ChatStore`] 接口
//! Two collections, participants and messages. The core only talks to [`ChatStore`]

pub mod error;
pub mod memory;
pub mod postgres;
pub mod query;
pub mod timeout;
pub mod traits;

use std::sync::Arc;

pub use error::{describe_error, StoreError, StoreResult};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use query::{Audience, MessageQuery};
pub use timeout::TimeoutStore;
pub use traits::ChatStore;

use crate::conf::{StoreBackend, StoreConfig};

/// 共享存储句柄 / Shared store handle
pub type SharedStore = Arc<dyn ChatStore>;

/// 按配置打开存储，并套上操作超时
/// Open the configured backend wrapped with the per-operation timeout
pub async fn open(cfg: &StoreConfig) -> StoreResult<SharedStore> {
    let inner: SharedStore = match cfg.backend {
        StoreBackend::Memory => {
            tracing::info!("🗄️ Using in-memory store");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            tracing::info!("🗄️ Connecting to PostgreSQL store");
            Arc::new(PgStore::connect(cfg).await?)
        }
    };
    Ok(Arc::new(TimeoutStore::new(inner, cfg.operation_timeout)))
}
