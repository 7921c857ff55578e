use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::error::{StoreError, StoreResult};
use super::query::MessageQuery;
use super::traits::ChatStore;
use crate::domain::{Message, NewMessage, Participant};

/// 为每个存储操作加上超时 / Bounds every store operation with a timeout
///
/// 超时后内部 future 被丢弃，已取出的连接随之归还
/// On expiry the inner future is dropped, which returns any checked-out connection
pub struct TimeoutStore {
    inner: Arc<dyn ChatStore>,
    limit: Duration,
}

impl TimeoutStore {
    pub fn new(inner: Arc<dyn ChatStore>, limit: Duration) -> Self {
        Self { inner, limit }
    }

    async fn guard<T, F>(&self, operation: &str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>> + Send,
    {
        match tokio::time::timeout(self.limit, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("⏱️ store operation {} timed out after {:?}", operation, self.limit);
                Err(StoreError::Timeout {
                    operation: operation.to_string(),
                    timeout_ms: self.limit.as_millis() as u64,
                })
            }
        }
    }
}

#[async_trait]
impl ChatStore for TimeoutStore {
    async fn list_participants(&self) -> StoreResult<Vec<Participant>> {
        self.guard("list_participants", self.inner.list_participants())
            .await
    }

    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
        self.guard("find_participant", self.inner.find_participant(name))
            .await
    }

    async fn insert_participant_if_absent(&self, participant: &Participant) -> StoreResult<bool> {
        self.guard(
            "insert_participant_if_absent",
            self.inner.insert_participant_if_absent(participant),
        )
        .await
    }

    async fn touch_participant(&self, name: &str, last_status: i64) -> StoreResult<bool> {
        self.guard(
            "touch_participant",
            self.inner.touch_participant(name, last_status),
        )
        .await
    }

    async fn remove_participant_if_stale(&self, name: &str, cutoff: i64) -> StoreResult<bool> {
        self.guard(
            "remove_participant_if_stale",
            self.inner.remove_participant_if_stale(name, cutoff),
        )
        .await
    }

    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        self.guard("insert_message", self.inner.insert_message(message))
            .await
    }

    async fn query_messages(&self, query: &MessageQuery) -> StoreResult<Vec<Message>> {
        self.guard("query_messages", self.inner.query_messages(query))
            .await
    }

    async fn insert_participant_with_notice(
        &self,
        participant: &Participant,
        notice: NewMessage,
    ) -> StoreResult<bool> {
        self.guard(
            "insert_participant_with_notice",
            self.inner.insert_participant_with_notice(participant, notice),
        )
        .await
    }

    async fn remove_stale_with_notice(
        &self,
        participant: &Participant,
        cutoff: i64,
        notice: NewMessage,
    ) -> StoreResult<bool> {
        self.guard(
            "remove_stale_with_notice",
            self.inner.remove_stale_with_notice(participant, cutoff, notice),
        )
        .await
    }
}
