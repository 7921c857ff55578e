//! 在线状态跟踪 / Presence tracking
//!
//! 参与者状态机：`absent -> active`（注册）`-> active`（心跳）`-> absent`（超时清理）
//! Participant lifecycle: `absent -> active` (register) `-> active` (heartbeat)
//! `-> absent` (swept after going stale)

use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::comm::now_millis;
use crate::domain::{normalize_name, NewMessage, Participant, JOIN_TEXT, LEAVE_TEXT};
use crate::error::{AppError, AppResult};
use crate::storage::{SharedStore, StoreResult};

/// 单个参与者清理失败 / A participant that could not be reaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReapFailure {
    pub name: String,
    pub error: String,
}

/// 一次清理的结果 / Outcome of one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// 本次扫描的参与者数量
    pub scanned: usize,
    /// 已移除（并写入离开提示）的参与者
    pub removed: Vec<String>,
    /// 删除前已刷新心跳或已被移除，跳过
    pub skipped: Vec<String>,
    pub failed: Vec<ReapFailure>,
}

/// 在线状态跟踪器 / Presence tracker
///
/// 不持有任何状态副本，所有读写直接经过存储
/// Holds no copy of the state; every read and write goes through the store
#[derive(Clone)]
pub struct PresenceTracker {
    store: SharedStore,
}

impl PresenceTracker {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// 全部参与者 / Every participant record
    pub async fn list(&self) -> AppResult<Vec<Participant>> {
        Ok(self.store.list_participants().await?)
    }

    /// 参与者是否在线 / Whether `name` is an active participant
    pub async fn is_active(&self, name: &str) -> AppResult<bool> {
        Ok(self.store.find_participant(name).await?.is_some())
    }

    /// 注册参与者并广播进入提示
    /// Register a participant and broadcast the join notice
    pub async fn register(&self, raw_name: Option<&str>) -> AppResult<Participant> {
        let name = normalize_name(raw_name)?;
        let participant = Participant::new(name.clone(), now_millis());

        // 参与者与进入提示一并写入，失败时两者都不生效
        // The participant and its join notice land together or not at all
        let notice = NewMessage::status(name.clone(), JOIN_TEXT);
        if !self
            .store
            .insert_participant_with_notice(&participant, notice)
            .await?
        {
            debug!("participant name already taken: {}", name);
            return Err(AppError::conflict(format!("participant {}", name)));
        }

        info!("👋 {} joined", name);
        Ok(participant)
    }

    /// 刷新心跳 / Refresh the heartbeat
    pub async fn heartbeat(&self, name: Option<&str>) -> AppResult<()> {
        let name = name.map(str::trim).unwrap_or_default();
        if name.is_empty() || !self.store.touch_participant(name, now_millis()).await? {
            return Err(AppError::not_found(format!("participant {}", name)));
        }
        debug!("💓 heartbeat from {}", name);
        Ok(())
    }

    /// 清理超时参与者 / Remove every participant idle for at least `stale_threshold`
    ///
    /// 每个超时参与者在独立任务中“删除 + 写离开提示”，互不影响。
    /// 删除带条件 `last_status <= now - threshold`，与心跳并发时心跳优先。
    /// Each stale participant gets its own task doing delete + leave notice,
    /// isolated from the others. The delete is conditional on
    /// `last_status <= now - threshold`, so a concurrent heartbeat wins.
    pub async fn sweep(&self, stale_threshold: Duration, now: i64) -> StoreResult<SweepReport> {
        let threshold_ms = i64::try_from(stale_threshold.as_millis()).unwrap_or(i64::MAX);
        let cutoff = now.saturating_sub(threshold_ms);

        let participants = self.store.list_participants().await?;
        let mut report = SweepReport {
            scanned: participants.len(),
            ..SweepReport::default()
        };

        let mut tasks = JoinSet::new();
        let mut names = HashMap::new();
        for participant in participants
            .into_iter()
            .filter(|p| p.is_stale(now, threshold_ms))
        {
            let store = self.store.clone();
            let name = participant.name.clone();
            let handle = tasks.spawn(async move { reap_one(&store, &participant, cutoff).await });
            names.insert(handle.id(), name);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((id, outcome)) => {
                    let name = names.remove(&id).unwrap_or_default();
                    match outcome {
                        Ok(true) => {
                            info!("🧹 {} left (idle)", name);
                            report.removed.push(name);
                        }
                        Ok(false) => {
                            debug!("{} refreshed or already gone, skipped", name);
                            report.skipped.push(name);
                        }
                        Err(e) => {
                            warn!("failed to reap {}: {}", name, e);
                            report.failed.push(ReapFailure {
                                name,
                                error: e.to_string(),
                            });
                        }
                    }
                }
                Err(join_err) => {
                    let name = names.remove(&join_err.id()).unwrap_or_default();
                    error!("reap task for {} aborted: {}", name, join_err);
                    report.failed.push(ReapFailure {
                        name,
                        error: join_err.to_string(),
                    });
                }
            }
        }

        report.removed.sort();
        report.skipped.sort();
        Ok(report)
    }
}

/// 删除单个超时参与者并写入离开提示（同一存储操作）
async fn reap_one(
    store: &SharedStore,
    participant: &Participant,
    cutoff: i64,
) -> StoreResult<bool> {
    let notice = NewMessage::status(participant.name.clone(), LEAVE_TEXT);
    store
        .remove_stale_with_notice(participant, cutoff, notice)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageType, EVERYONE};
    use crate::storage::{Audience, ChatStore, MemoryStore, MessageQuery};
    use std::sync::Arc;

    fn tracker() -> (PresenceTracker, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (PresenceTracker::new(store.clone()), store)
    }

    /// 进出提示均为广播，以旁观者身份读取
    /// Join and leave notices are broadcast; read them as a bystander
    async fn all_messages(store: &MemoryStore) -> Vec<crate::domain::Message> {
        let bystander = MessageQuery {
            audience: Audience::new(Some("Observer".to_string()), false),
            limit: None,
        };
        let mut msgs = store.query_messages(&bystander).await.unwrap();
        msgs.reverse();
        msgs
    }

    #[tokio::test]
    async fn test_register_emits_join_notice() {
        let (tracker, store) = tracker();
        let p = tracker.register(Some("  Alice  ")).await.unwrap();
        assert_eq!(p.name, "Alice");

        let msgs = all_messages(&store).await;
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].from, "Alice");
        assert_eq!(msgs[0].to, EVERYONE);
        assert_eq!(msgs[0].text, JOIN_TEXT);
        assert_eq!(msgs[0].msg_type, MessageType::Status);
    }

    #[tokio::test]
    async fn test_register_duplicate_conflicts() {
        let (tracker, store) = tracker();
        tracker.register(Some("Alice")).await.unwrap();
        let err = tracker.register(Some("Alice ")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
        // 冲突时不写入提示 / no notice for the rejected attempt
        assert_eq!(all_messages(&store).await.len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_blank_name() {
        let (tracker, _) = tracker();
        assert!(matches!(
            tracker.register(Some("   ")).await,
            Err(AppError::Validation { .. })
        ));
        assert!(matches!(
            tracker.register(None).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_registration_single_winner() {
        let (tracker, store) = tracker();
        let mut set = JoinSet::new();
        for _ in 0..16 {
            let t = tracker.clone();
            set.spawn(async move { t.register(Some("Zed")).await.is_ok() });
        }
        let mut wins = 0;
        while let Some(ok) = set.join_next().await {
            if ok.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(store.list_participants().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_heartbeat_unknown_is_not_found() {
        let (tracker, _) = tracker();
        assert!(matches!(
            tracker.heartbeat(Some("Ghost")).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(
            tracker.heartbeat(None).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_heartbeat_refreshes_without_message() {
        let (tracker, store) = tracker();
        store
            .insert_participant_if_absent(&Participant::new("Bob", 0))
            .await
            .unwrap();
        tracker.heartbeat(Some("Bob")).await.unwrap();
        let bob = store.find_participant("Bob").await.unwrap().unwrap();
        assert!(bob.last_status > 0);
        assert!(all_messages(&store).await.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_removes_exactly_stale() {
        let (tracker, store) = tracker();
        let now = 1_000_000;
        for (name, age) in [("Dave", 11_000), ("Erin", 10_000), ("Finn", 5_000), ("Gus", 0)] {
            store
                .insert_participant_if_absent(&Participant::new(name, now - age))
                .await
                .unwrap();
        }

        let report = tracker
            .sweep(Duration::from_millis(10_000), now)
            .await
            .unwrap();
        assert_eq!(report.scanned, 4);
        assert_eq!(report.removed, vec!["Dave".to_string(), "Erin".to_string()]);
        assert!(report.failed.is_empty());

        let left: Vec<String> = store
            .list_participants()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(left, vec!["Finn".to_string(), "Gus".to_string()]);

        let notices = all_messages(&store).await;
        assert_eq!(notices.len(), 2);
        for n in &notices {
            assert_eq!(n.text, LEAVE_TEXT);
            assert_eq!(n.to, EVERYONE);
            assert_eq!(n.msg_type, MessageType::Status);
        }
        let mut from: Vec<&str> = notices.iter().map(|m| m.from.as_str()).collect();
        from.sort();
        assert_eq!(from, vec!["Dave", "Erin"]);
    }

    #[tokio::test]
    async fn test_second_sweep_emits_nothing_new() {
        let (tracker, store) = tracker();
        store
            .insert_participant_if_absent(&Participant::new("Dave", 0))
            .await
            .unwrap();
        let first = tracker.sweep(Duration::from_secs(10), 20_000).await.unwrap();
        let second = tracker.sweep(Duration::from_secs(10), 20_000).await.unwrap();
        assert_eq!(first.removed.len(), 1);
        assert!(second.removed.is_empty());
        let visible = store
            .query_messages(&MessageQuery {
                audience: Audience::default(),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(visible.len(), 1);
    }
}
