use async_trait::async_trait;

use super::error::StoreResult;
use super::query::MessageQuery;
use crate::domain::{Message, NewMessage, Participant};

/// 聊天存储接口：参与者与消息两个集合
/// Chat store contract over the participants and messages collections
///
/// 每个方法是一次独立的存储操作，实现方负责在所有退出路径上释放连接
/// Each method is one store operation; implementations release their
/// connection on every exit path
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// 全部参与者（插入顺序）/ All participants in insertion order
    async fn list_participants(&self) -> StoreResult<Vec<Participant>>;

    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>>;

    /// 原子地“不存在则插入”，名称已被占用时返回 `false`
    /// Atomic insert-if-absent; `false` when the name is already taken
    async fn insert_participant_if_absent(&self, participant: &Participant) -> StoreResult<bool>;

    /// 刷新心跳时间，参与者不存在时返回 `false`
    async fn touch_participant(&self, name: &str, last_status: i64) -> StoreResult<bool>;

    /// 仅当 `last_status <= cutoff` 时删除，返回是否删除
    /// Delete only while `last_status <= cutoff`; returns whether a row went away
    async fn remove_participant_if_stale(&self, name: &str, cutoff: i64) -> StoreResult<bool>;

    /// 追加消息并分配单调递增的 `id`
    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message>;

    /// 按查询条件返回消息，**从新到旧**排列
    /// Matching messages ordered **newest first**
    async fn query_messages(&self, query: &MessageQuery) -> StoreResult<Vec<Message>>;

    /// 注册参与者并写入进入提示，两者同时成功或同时不生效
    /// Insert the participant together with its join notice; both land or neither does
    ///
    /// 名称已被占用时返回 `false` 且不写入提示。默认实现在提示写入失败时撤销插入，
    /// 具备事务能力的后端应覆盖此方法。
    /// Returns `false` without a notice when the name is taken. The default undoes
    /// the insert when the notice fails; backends with transactions override it.
    async fn insert_participant_with_notice(
        &self,
        participant: &Participant,
        notice: NewMessage,
    ) -> StoreResult<bool> {
        if !self.insert_participant_if_absent(participant).await? {
            return Ok(false);
        }
        if let Err(e) = self.insert_message(notice).await {
            if let Err(undo) = self
                .remove_participant_if_stale(&participant.name, participant.last_status)
                .await
            {
                tracing::error!(
                    "failed to undo registration of {}: {}",
                    participant.name,
                    undo
                );
            }
            return Err(e);
        }
        Ok(true)
    }

    /// 删除超时参与者并写入离开提示，两者同时成功或同时不生效
    /// Remove a stale participant together with its leave notice; both land or
    /// neither does
    ///
    /// 仅当 `last_status <= cutoff` 时删除；未删除时返回 `false` 且不写入提示。
    /// 默认实现在提示写入失败时按原 `last_status` 恢复参与者，下个周期重试。
    /// Deletes only while `last_status <= cutoff`; returns `false` without a notice
    /// otherwise. The default restores the participant with its previous
    /// `last_status` when the notice fails, so the next sweep retries.
    async fn remove_stale_with_notice(
        &self,
        participant: &Participant,
        cutoff: i64,
        notice: NewMessage,
    ) -> StoreResult<bool> {
        if !self
            .remove_participant_if_stale(&participant.name, cutoff)
            .await?
        {
            return Ok(false);
        }
        if let Err(e) = self.insert_message(notice).await {
            if let Err(undo) = self.insert_participant_if_absent(participant).await {
                tracing::error!("failed to restore {}: {}", participant.name, undo);
            }
            return Err(e);
        }
        Ok(true)
    }
}
