use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::StoreResult;
use super::query::MessageQuery;
use super::traits::ChatStore;
use crate::domain::{Message, NewMessage, Participant};

/// 内存存储 / In-memory store
///
/// 锁只在同步代码段内持有，不跨越 `.await`
/// Locks are only held inside synchronous sections, never across `.await`
#[derive(Default)]
pub struct MemoryStore {
    participants: RwLock<Vec<Participant>>,
    messages: RwLock<Vec<Message>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn push_message(messages: &mut Vec<Message>, message: NewMessage) -> Message {
    let id = messages.last().map(|m| m.id + 1).unwrap_or(1);
    let stored = message.into_stored(id);
    messages.push(stored.clone());
    stored
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn list_participants(&self) -> StoreResult<Vec<Participant>> {
        Ok(self.participants.read().clone())
    }

    async fn find_participant(&self, name: &str) -> StoreResult<Option<Participant>> {
        Ok(self
            .participants
            .read()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn insert_participant_if_absent(&self, participant: &Participant) -> StoreResult<bool> {
        // 检查与插入在同一把写锁内完成 / check and insert under one write lock
        let mut participants = self.participants.write();
        if participants.iter().any(|p| p.name == participant.name) {
            return Ok(false);
        }
        participants.push(participant.clone());
        Ok(true)
    }

    async fn touch_participant(&self, name: &str, last_status: i64) -> StoreResult<bool> {
        let mut participants = self.participants.write();
        match participants.iter_mut().find(|p| p.name == name) {
            Some(p) => {
                p.last_status = last_status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_participant_if_stale(&self, name: &str, cutoff: i64) -> StoreResult<bool> {
        let mut participants = self.participants.write();
        let before = participants.len();
        participants.retain(|p| !(p.name == name && p.last_status <= cutoff));
        Ok(participants.len() != before)
    }

    async fn insert_message(&self, message: NewMessage) -> StoreResult<Message> {
        Ok(push_message(&mut self.messages.write(), message))
    }

    async fn insert_participant_with_notice(
        &self,
        participant: &Participant,
        notice: NewMessage,
    ) -> StoreResult<bool> {
        // 锁顺序固定：先参与者后消息 / lock order: participants, then messages
        let mut participants = self.participants.write();
        if participants.iter().any(|p| p.name == participant.name) {
            return Ok(false);
        }
        let mut messages = self.messages.write();
        participants.push(participant.clone());
        push_message(&mut messages, notice);
        Ok(true)
    }

    async fn remove_stale_with_notice(
        &self,
        participant: &Participant,
        cutoff: i64,
        notice: NewMessage,
    ) -> StoreResult<bool> {
        let mut participants = self.participants.write();
        let before = participants.len();
        participants.retain(|p| !(p.name == participant.name && p.last_status <= cutoff));
        if participants.len() == before {
            return Ok(false);
        }
        push_message(&mut self.messages.write(), notice);
        Ok(true)
    }

    async fn query_messages(&self, query: &MessageQuery) -> StoreResult<Vec<Message>> {
        let messages = self.messages.read();
        let matching = messages
            .iter()
            .rev()
            .filter(|m| query.audience.permits(m))
            .cloned();
        Ok(match query.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }
}
