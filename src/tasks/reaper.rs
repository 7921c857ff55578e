use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::comm::now_millis;
use crate::conf::ReaperConfig;
use crate::service::{PresenceTracker, SweepReport};

/// 超时参与者清理调度器 / Idle participant reaper
///
/// 按固定周期调用 [`PresenceTracker::sweep`]。单次失败只记录日志，不影响后续周期；
/// 每次清理执行完毕后才会进入下一个周期，因此同一调度器的清理不会重叠。
/// Calls [`PresenceTracker::sweep`] on a fixed period. A failed tick is logged
/// and the next tick still runs; a tick finishes before the next one starts,
/// so one scheduler never overlaps its own sweeps.
pub struct ReaperScheduler {
    tracker: PresenceTracker,
    period: Duration,
    stale_threshold: Duration,
}

impl ReaperScheduler {
    pub fn new(tracker: PresenceTracker, config: &ReaperConfig) -> Self {
        Self {
            tracker,
            period: config.interval,
            stale_threshold: config.stale_threshold,
        }
    }

    /// 执行一次清理，错误只记录 / Run one sweep, logging instead of failing
    pub async fn tick(&self) -> Option<SweepReport> {
        match self.tracker.sweep(self.stale_threshold, now_millis()).await {
            Ok(report) => {
                if !report.removed.is_empty() || !report.failed.is_empty() {
                    tracing::info!(
                        "🧹 Reaper swept {} participants: removed={:?} failed={}",
                        report.scanned,
                        report.removed,
                        report.failed.len()
                    );
                }
                Some(report)
            }
            Err(e) => {
                tracing::error!("❌ Reaper sweep failed: {}", e);
                None
            }
        }
    }

    /// 启动后台清理任务，`shutdown_rx` 变为 `true` 时退出
    /// Spawn the background task; it exits once `shutdown_rx` turns `true`
    pub fn spawn(self, mut shutdown_rx: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                "⏰ Reaper interval {}ms, stale threshold {}ms",
                self.period.as_millis(),
                self.stale_threshold.as_millis()
            );
            let mut ticker = interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 第一次 tick 立即完成，跳过以保持完整周期
            // The first tick completes immediately; skip it to keep a full period
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        self.tick().await;
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            tracing::info!("⏹️ Reaper stopped");
        })
    }
}
