//! 后台任务 / Background tasks

pub mod reaper;

pub use reaper::ReaperScheduler;
